//! OHLCV bar representation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One OHLCV sample for a fixed interval. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// The synthetic "current quote" derived from the bar being replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub timestamp: NaiveDateTime,
}

impl Quote {
    /// Close price and timestamp of `bar`.
    pub fn from_bar(symbol: &str, bar: &Bar) -> Self {
        Quote {
            symbol: symbol.to_string(),
            price: bar.close,
            timestamp: bar.timestamp,
        }
    }
}
