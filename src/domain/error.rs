//! Domain error types.

use chrono::NaiveDateTime;

/// A strategy could not produce signals for one bar.
///
/// The replay loop absorbs this: the bar is logged, counted as skipped, and
/// the run moves on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("strategy error: {message}")]
pub struct StrategyError {
    pub message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn insufficient_history(need: usize, have: usize) -> Self {
        Self::new(format!("insufficient history: need {need}, have {have}"))
    }
}

/// Top-level error type for barsim.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("malformed bar at row {row}, field {field}: {reason}")]
    DataFormat {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("bars out of order at row {row}: {current} does not follow {previous}")]
    UnorderedBars {
        row: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("insufficient data: need {need} bars, have {have}")]
    InsufficientData { need: usize, have: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    pub(crate) fn data_format(row: usize, field: &str, reason: impl Into<String>) -> Self {
        BacktestError::DataFormat {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::DataFormat { .. } | BacktestError::UnorderedBars { .. } => 3,
            BacktestError::InsufficientData { .. } => 5,
            BacktestError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_history_message() {
        let err = StrategyError::insufficient_history(10, 3);
        assert_eq!(
            err.to_string(),
            "strategy error: insufficient history: need 10, have 3"
        );
    }

    #[test]
    fn data_format_display() {
        let err = BacktestError::data_format(4, "close", "invalid float literal");
        assert_eq!(
            err.to_string(),
            "malformed bar at row 4, field close: invalid float literal"
        );
    }

    #[test]
    fn insufficient_data_display() {
        let err = BacktestError::InsufficientData { need: 10, have: 4 };
        assert_eq!(err.to_string(), "insufficient data: need 10 bars, have 4");
    }

    #[test]
    fn exit_codes_are_distinct_per_category() {
        use std::process::ExitCode;

        let config = ExitCode::from(&BacktestError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        });
        let data = ExitCode::from(&BacktestError::data_format(1, "open", "bad"));
        assert_ne!(format!("{config:?}"), format!("{data:?}"));
    }
}
