//! Trading signals produced by a strategy for the current bar.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub side: Side,
    pub price: f64,
}

impl Signal {
    pub fn buy(symbol: impl Into<String>, price: f64) -> Self {
        Signal {
            symbol: symbol.into(),
            side: Side::Buy,
            price,
        }
    }

    pub fn sell(symbol: impl Into<String>, price: f64) -> Self {
        Signal {
            symbol: symbol.into(),
            side: Side::Sell,
            price,
        }
    }
}
