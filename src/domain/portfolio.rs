//! Cash balances and open positions for one run.
//!
//! The ledger is the sole owner of both; its mutators are crate-private and
//! only the execution simulator calls them. Strategies see a borrowed
//! [`PortfolioSnapshot`].

use serde::Serialize;
use std::collections::BTreeMap;

use super::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Balance {
    pub available: f64,
    pub blocked: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    currency: String,
    balances: BTreeMap<String, Balance>,
    positions: Vec<Position>,
}

impl Ledger {
    pub fn new(currency: impl Into<String>, initial_cash: f64) -> Self {
        let currency = currency.into();
        let mut balances = BTreeMap::new();
        balances.insert(
            currency.clone(),
            Balance {
                available: initial_cash,
                blocked: 0.0,
                total: initial_cash,
            },
        );
        Ledger {
            currency,
            balances,
            positions: Vec::new(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Available cash in the settlement currency.
    pub fn available(&self) -> f64 {
        self.balances
            .get(&self.currency)
            .map(|b| b.available)
            .unwrap_or(0.0)
    }

    pub fn balance(&self, currency: &str) -> Option<&Balance> {
        self.balances.get(currency)
    }

    pub fn balances(&self) -> &BTreeMap<String, Balance> {
        &self.balances
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Index of the first open position for `symbol`, in insertion order.
    pub fn find_open(&self, symbol: &str) -> Option<usize> {
        self.positions
            .iter()
            .position(|p| p.symbol == symbol && p.is_open())
    }

    pub fn has_open_position(&self, symbol: &str) -> bool {
        self.find_open(symbol).is_some()
    }

    pub fn snapshot(&self) -> PortfolioSnapshot<'_> {
        PortfolioSnapshot {
            currency: &self.currency,
            balances: &self.balances,
            positions: &self.positions,
        }
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balances.entry(self.currency.clone()).or_default().available -= amount;
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balances.entry(self.currency.clone()).or_default().available += amount;
    }

    pub(crate) fn open_position(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Removes the position at `index`, keeping the order of the rest.
    pub(crate) fn close_position(&mut self, index: usize) -> Position {
        self.positions.remove(index)
    }
}

/// Read-only view of a ledger handed to strategies.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioSnapshot<'a> {
    currency: &'a str,
    balances: &'a BTreeMap<String, Balance>,
    positions: &'a [Position],
}

impl<'a> PortfolioSnapshot<'a> {
    pub fn currency(&self) -> &'a str {
        self.currency
    }

    pub fn available(&self) -> f64 {
        self.balances
            .get(self.currency)
            .map(|b| b.available)
            .unwrap_or(0.0)
    }

    pub fn balances(&self) -> &'a BTreeMap<String, Balance> {
        self.balances
    }

    pub fn positions(&self) -> &'a [Position] {
        self.positions
    }

    pub fn position(&self, symbol: &str) -> Option<&'a Position> {
        self.positions
            .iter()
            .find(|p| p.symbol == symbol && p.is_open())
    }

    pub fn has_open_position(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }
}
