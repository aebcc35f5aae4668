//! Fill simulation.
//!
//! Each signal turns into at most one ledger mutation. Rejections are
//! reported as [`FillOutcome`] values rather than errors so the replay loop
//! can log them and keep going.

use chrono::NaiveDateTime;
use log::{debug, warn};

use super::portfolio::Ledger;
use super::position::{Position, TradeRecord};
use super::signal::{Side, Signal};

pub const DEFAULT_RISK_FRACTION: f64 = 0.01;
pub const DEFAULT_CURRENCY: &str = "RUB";

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Settlement currency whose `available` balance pays for fills.
    pub currency: String,
    /// Share of available cash committed to a single buy.
    pub risk_fraction: f64,
    /// Reject buys for a symbol that already has an open position.
    pub single_position_per_symbol: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            currency: DEFAULT_CURRENCY.to_string(),
            risk_fraction: DEFAULT_RISK_FRACTION,
            single_position_per_symbol: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Bought {
        lots: i64,
        cost: f64,
        record: TradeRecord,
    },
    Sold {
        quantity: i64,
        proceeds: f64,
        profit: f64,
        record: TradeRecord,
    },
    /// Sizing produced zero whole lots.
    RejectedZeroLots,
    /// Sized cost exceeds available cash.
    RejectedInsufficientFunds,
    /// A position for the symbol is already open.
    RejectedPositionOpen,
    /// Price was not a positive finite number.
    RejectedInvalidPrice,
    /// Sell with nothing open for the symbol.
    NoOpenPosition,
}

impl FillOutcome {
    pub fn is_fill(&self) -> bool {
        matches!(self, FillOutcome::Bought { .. } | FillOutcome::Sold { .. })
    }

    pub fn record(&self) -> Option<&TradeRecord> {
        match self {
            FillOutcome::Bought { record, .. } | FillOutcome::Sold { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Whole lots affordable with `available * risk_fraction` at `price`. Never
/// negative; a non-positive or non-finite input yields 0.
pub fn calculate_lots(available: f64, risk_fraction: f64, price: f64) -> i64 {
    if price <= 0.0 || !price.is_finite() || available <= 0.0 || !available.is_finite() {
        return 0;
    }
    if risk_fraction <= 0.0 || !risk_fraction.is_finite() {
        return 0;
    }
    ((available * risk_fraction) / price).floor().max(0.0) as i64
}

pub fn execute_signal(
    ledger: &mut Ledger,
    signal: &Signal,
    time: NaiveDateTime,
    config: &ExecutionConfig,
) -> FillOutcome {
    match signal.side {
        Side::Buy => execute_buy(ledger, signal, time, config),
        Side::Sell => execute_sell(ledger, signal, time),
    }
}

/// Open a position sized as `floor(available * risk_fraction / price)` lots.
pub fn execute_buy(
    ledger: &mut Ledger,
    signal: &Signal,
    time: NaiveDateTime,
    config: &ExecutionConfig,
) -> FillOutcome {
    if signal.price <= 0.0 || !signal.price.is_finite() {
        warn!("{}: ignoring buy at invalid price {}", signal.symbol, signal.price);
        return FillOutcome::RejectedInvalidPrice;
    }

    if config.single_position_per_symbol && ledger.has_open_position(&signal.symbol) {
        debug!("{}: buy rejected, position already open", signal.symbol);
        return FillOutcome::RejectedPositionOpen;
    }

    let available = ledger.available();
    let lots = calculate_lots(available, config.risk_fraction, signal.price);
    if lots <= 0 {
        warn!(
            "{}: insufficient funds to open a position at {} (available {:.2})",
            signal.symbol, signal.price, available
        );
        return FillOutcome::RejectedZeroLots;
    }

    let cost = signal.price * lots as f64;
    if cost > available {
        warn!(
            "{}: buy of {} lots costs {:.2}, only {:.2} available",
            signal.symbol, lots, cost, available
        );
        return FillOutcome::RejectedInsufficientFunds;
    }

    ledger.debit(cost);
    let position = Position {
        symbol: signal.symbol.clone(),
        quantity: lots,
        average_price: signal.price,
        open_time: time,
    };
    let record = TradeRecord::opened(&position);
    ledger.open_position(position);

    debug!(
        "{}: bought {} lots at {} (cash {:.2})",
        signal.symbol,
        lots,
        signal.price,
        ledger.available()
    );

    FillOutcome::Bought { lots, cost, record }
}

/// Close the first open position for the signal's symbol.
pub fn execute_sell(ledger: &mut Ledger, signal: &Signal, time: NaiveDateTime) -> FillOutcome {
    if signal.price <= 0.0 || !signal.price.is_finite() {
        warn!("{}: ignoring sell at invalid price {}", signal.symbol, signal.price);
        return FillOutcome::RejectedInvalidPrice;
    }

    let Some(index) = ledger.find_open(&signal.symbol) else {
        debug!("{}: sell ignored, no open position", signal.symbol);
        return FillOutcome::NoOpenPosition;
    };

    let position = ledger.close_position(index);
    let proceeds = signal.price * position.quantity as f64;
    ledger.credit(proceeds);

    let record = TradeRecord::closed(&position, signal.price, time);
    let profit = record.realized_profit();

    debug!(
        "{}: sold {} lots at {} for profit {:.2} (cash {:.2})",
        signal.symbol,
        position.quantity,
        signal.price,
        profit,
        ledger.available()
    );

    FillOutcome::Sold {
        quantity: position.quantity,
        proceeds,
        profit,
        record,
    }
}
