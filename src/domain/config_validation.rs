//! Configuration validation.
//!
//! Validates all config fields before a run starts.

use crate::domain::error::BacktestError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const KNOWN_STRATEGIES: &[&str] = &["sma_trend"];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_symbol(config)?;
    validate_initial_capital(config)?;
    validate_currency(config)?;
    validate_risk_fraction(config)?;
    validate_risk_free_rate(config)?;
    validate_warmup_period(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_strategy_name(config)?;
    validate_period(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> BacktestError {
    BacktestError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("backtest", "symbol", "symbol must not be empty")),
        None => Err(BacktestError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("backtest", "initial_capital", 100_000.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_currency(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    match config.get_string("backtest", "currency") {
        Some(s) if s.trim().is_empty() => {
            Err(invalid("backtest", "currency", "currency must not be empty"))
        }
        _ => Ok(()),
    }
}

fn validate_risk_fraction(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("backtest", "risk_fraction", 0.01);
    if value <= 0.0 || value > 1.0 || !value.is_finite() {
        return Err(invalid(
            "backtest",
            "risk_fraction",
            "risk_fraction must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.02);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_warmup_period(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_int("backtest", "warmup_period", 10);
    if value < 0 {
        return Err(invalid(
            "backtest",
            "warmup_period",
            "warmup_period must be non-negative",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, BacktestError> {
    match value {
        None => Err(BacktestError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "backtest",
                field,
                &format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let name = config
        .get_string("strategy", "name")
        .unwrap_or_else(|| "sma_trend".to_string());
    if !KNOWN_STRATEGIES.contains(&name.trim()) {
        return Err(invalid(
            "strategy",
            "name",
            &format!("unknown strategy '{}'", name.trim()),
        ));
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_int("strategy", "period", 10);
    if value < 1 {
        return Err(invalid("strategy", "period", "period must be at least 1"));
    }
    Ok(())
}
