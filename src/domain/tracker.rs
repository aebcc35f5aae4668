//! Running equity peak, maximum drawdown, and the trade log.
//!
//! Equity is cash-only: open positions are not marked to market, so the
//! drawdown reported here can understate the drawdown of the full book.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::position::TradeRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceTracker {
    max_equity: f64,
    max_drawdown: f64,
    trade_log: Vec<TradeRecord>,
    equity_curve: Vec<EquityPoint>,
}

impl PerformanceTracker {
    /// Starts with the initial cash as the running peak.
    pub fn new(initial_equity: f64) -> Self {
        PerformanceTracker {
            max_equity: initial_equity,
            max_drawdown: 0.0,
            trade_log: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Fold one equity observation into the peak and drawdown trackers.
    /// Returns the drawdown of this observation in percent.
    pub fn observe(&mut self, timestamp: NaiveDateTime, equity: f64) -> f64 {
        if equity > self.max_equity {
            self.max_equity = equity;
        }
        let drawdown = drawdown_pct(self.max_equity, equity);
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        self.equity_curve.push(EquityPoint { timestamp, equity });
        drawdown
    }

    pub fn record_fill(&mut self, record: TradeRecord) {
        self.trade_log.push(record);
    }

    pub fn max_equity(&self) -> f64 {
        self.max_equity
    }

    /// Largest peak-to-trough decline seen so far, in percent.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn trade_log(&self) -> &[TradeRecord] {
        &self.trade_log
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }
}

/// `(peak - equity) / peak * 100`, 0 when the peak is not positive.
pub fn drawdown_pct(peak: f64, equity: f64) -> f64 {
    if peak <= 0.0 {
        return 0.0;
    }
    (peak - equity) / peak * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn drawdown_from_peak() {
        let mut tracker = PerformanceTracker::new(100.0);
        tracker.observe(ts(1), 110.0);
        let dd = tracker.observe(ts(2), 88.0);
        assert!((dd - 20.0).abs() < 1e-9);
        assert!((tracker.max_equity() - 110.0).abs() < f64::EPSILON);
        assert!((tracker.max_drawdown() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_never_decreases() {
        let mut tracker = PerformanceTracker::new(100.0);
        tracker.observe(ts(1), 80.0);
        tracker.observe(ts(2), 100.0);
        tracker.observe(ts(3), 95.0);
        assert!((tracker.max_drawdown() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn initial_equity_is_the_first_peak() {
        let mut tracker = PerformanceTracker::new(1000.0);
        tracker.observe(ts(1), 900.0);
        assert!((tracker.max_drawdown() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_peak_yields_zero_drawdown() {
        let mut tracker = PerformanceTracker::new(0.0);
        let dd = tracker.observe(ts(1), 0.0);
        assert_eq!(dd, 0.0);
        assert_eq!(tracker.max_drawdown(), 0.0);
        assert!(dd.is_finite());
    }

    #[test]
    fn equity_curve_records_every_observation() {
        let mut tracker = PerformanceTracker::new(100.0);
        tracker.observe(ts(1), 100.0);
        tracker.observe(ts(2), 99.0);
        assert_eq!(tracker.equity_curve().len(), 2);
        assert_eq!(tracker.equity_curve()[1].timestamp, ts(2));
    }

    #[test]
    fn record_fill_appends_to_trade_log() {
        use crate::domain::position::{Position, TradeRecord};

        let mut tracker = PerformanceTracker::new(100.0);
        let position = Position {
            symbol: "SBER".into(),
            quantity: 1,
            average_price: 10.0,
            open_time: ts(1),
        };
        tracker.record_fill(TradeRecord::opened(&position));
        tracker.observe(ts(1), 90.0);

        assert_eq!(tracker.trade_log().len(), 1);
        assert_eq!(tracker.trade_log()[0].quantity, 1);
        assert_eq!(tracker.equity_curve().len(), 1);
        assert!((tracker.equity_curve()[0].equity - 90.0).abs() < f64::EPSILON);
    }
}
