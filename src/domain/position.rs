//! Open positions and the per-fill trade log entry.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::signal::Side;

/// An open long holding. `quantity` is in whole lots and stays positive while
/// the position is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: i64,
    pub average_price: f64,
    pub open_time: NaiveDateTime,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.quantity > 0
    }

    /// Cash spent to open the position.
    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.average_price
    }

    /// Profit from closing the whole position at `price`.
    pub fn profit_at(&self, price: f64) -> f64 {
        (price - self.average_price) * self.quantity as f64
    }
}

/// One entry per accepted fill. A buy carries only the open leg; a sell
/// carries the full round trip and its realized profit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub side: Side,
    pub quantity: i64,
    pub open_price: f64,
    pub open_time: NaiveDateTime,
    pub close_price: Option<f64>,
    pub close_time: Option<NaiveDateTime>,
    pub profit: Option<f64>,
}

impl TradeRecord {
    pub fn opened(position: &Position) -> Self {
        TradeRecord {
            symbol: position.symbol.clone(),
            side: Side::Buy,
            quantity: position.quantity,
            open_price: position.average_price,
            open_time: position.open_time,
            close_price: None,
            close_time: None,
            profit: None,
        }
    }

    pub fn closed(position: &Position, close_price: f64, close_time: NaiveDateTime) -> Self {
        TradeRecord {
            symbol: position.symbol.clone(),
            side: Side::Sell,
            quantity: position.quantity,
            open_price: position.average_price,
            open_time: position.open_time,
            close_price: Some(close_price),
            close_time: Some(close_time),
            profit: Some(position.profit_at(close_price)),
        }
    }

    /// Realized profit, 0 for an open leg.
    pub fn realized_profit(&self) -> f64 {
        self.profit.unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        self.profit.is_some()
    }
}
