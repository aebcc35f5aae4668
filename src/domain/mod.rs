//! Core domain types and logic.

pub mod ohlcv;
pub mod bar_series;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod strategy;
pub mod sma_trend;
pub mod tracker;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
