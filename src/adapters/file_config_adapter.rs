//! INI file configuration adapter.

use crate::domain::error::BacktestError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BacktestError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BacktestError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BacktestError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BacktestError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[backtest]
symbol = SBER
start_date = 2024-01-01
end_date = 2024-12-31
initial_capital = 100000.0
risk_fraction = 0.01
warmup_period = 10
single_position_per_symbol = no

[strategy]
name = sma_trend
period = 20

[data]
dir = /var/lib/bars
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "symbol"),
            Some("SBER".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "dir"),
            Some("/var/lib/bars".to_string())
        );
        assert_eq!(adapter.get_int("strategy", "period", 0), 20);
        assert_eq!(adapter.get_double("backtest", "risk_fraction", 0.0), 0.01);
        assert!(!adapter.get_bool("backtest", "single_position_per_symbol", true));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "symbol"), None);
        assert_eq!(adapter.get_int("backtest", "warmup_period", 10), 10);
        assert_eq!(adapter.get_double("backtest", "risk_free_rate", 0.02), 0.02);
        assert!(adapter.get_bool("backtest", "single_position_per_symbol", true));
    }

    #[test]
    fn non_numeric_values_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nwarmup_period = ten\ninitial_capital = lots\n",
        )
        .unwrap();
        assert_eq!(adapter.get_int("backtest", "warmup_period", 10), 10);
        assert_eq!(adapter.get_double("backtest", "initial_capital", 5.0), 5.0);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\na = true\nb = yes\nc = 1\nd = off\ne = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("backtest", "a", false));
        assert!(adapter.get_bool("backtest", "b", false));
        assert!(adapter.get_bool("backtest", "c", false));
        assert!(!adapter.get_bool("backtest", "d", true));
        assert!(adapter.get_bool("backtest", "e", true));
    }

    #[test]
    fn string_or_and_usize_helpers() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\ncurrency =  USD \ninterval =\nwarmup_period = -3\n",
        )
        .unwrap();
        assert_eq!(adapter.get_string_or("backtest", "currency", "RUB"), "USD");
        assert_eq!(adapter.get_string_or("backtest", "interval", "1d"), "1d");
        assert_eq!(adapter.get_usize("backtest", "warmup_period", 10), 10);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("strategy", "name"),
            Some("sma_trend".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/barsim.ini");
        assert!(matches!(result, Err(BacktestError::ConfigParse { .. })));
    }
}
