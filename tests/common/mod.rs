#![allow(dead_code)]

use barsim::domain::backtest::BacktestConfig;
use barsim::domain::bar_series::BarSeries;
use barsim::domain::error::BacktestError;
use barsim::domain::execution::ExecutionConfig;
pub use barsim::domain::ohlcv::Bar;
use barsim::ports::data_port::BarSource;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

pub struct MockBarSource {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockBarSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl BarSource for MockBarSource {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        _interval: &str,
    ) -> Result<BarSeries, BacktestError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BacktestError::Io(std::io::Error::other(reason.clone())));
        }
        let bars = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date() >= start && b.date() <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        BarSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> Bar {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    Bar {
        timestamp: midnight(day),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting at `start`, closes taken from `closes`.
pub fn bars_from_closes(start: &str, closes: &[f64]) -> Vec<Bar> {
    let first = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: midnight(first + Duration::days(i as i64)),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// `count` daily bars with a slow upward drift and a sawtooth wiggle.
pub fn generate_bars(start: &str, count: usize, base_price: f64) -> Vec<Bar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| base_price + (i as f64) * 0.5 + ((i % 5) as f64 - 2.0) * 2.0)
        .collect();
    bars_from_closes(start, &closes)
}

pub fn series(symbol: &str, closes: &[f64]) -> BarSeries {
    BarSeries::new(symbol, bars_from_closes("2024-01-01", closes)).unwrap()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        interval: "1d".to_string(),
        initial_capital: 100_000.0,
        risk_free_rate: 0.02,
        warmup_period: 0,
        execution: ExecutionConfig::default(),
    }
}

pub const BAR_CSV_HEADER: &str = "timestamp,open,high,low,close,volume\n";

/// CSV body for `bars`, in the layout the CSV adapter reads.
pub fn bars_to_csv(bars: &[Bar]) -> String {
    let mut out = String::from(BAR_CSV_HEADER);
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
