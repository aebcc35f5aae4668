//! Run report and post-run statistics.
//!
//! Everything here is a pure function of the trade log and the run summary,
//! so computing a report twice from the same inputs yields equal values.
//!
//! The risk ratio is a Sharpe-style statistic over raw per-trade profit in
//! currency units. It is not annualized or normalized by capital and is only
//! meaningful for comparing runs of the same instrument and capital.

use chrono::NaiveDate;
use serde::Serialize;

use super::position::TradeRecord;
use super::signal::Side;
use super::tracker::EquityPoint;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Run-level facts gathered by the replay loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub symbol: String,
    pub interval: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub final_cash: f64,
    pub max_equity: f64,
    pub max_drawdown: f64,
    pub bars_processed: usize,
    pub skipped_bars: usize,
    pub rejected_signals: usize,
    pub ignored_sells: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub symbol: String,
    pub interval: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub final_cash: f64,
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub unprofitable_trades: usize,
    pub total_profit: f64,
    /// `None` when the run produced no fills.
    pub average_profit: Option<f64>,
    pub max_equity: f64,
    /// Percent.
    pub max_drawdown: f64,
    pub risk_ratio: f64,
    pub bars_processed: usize,
    pub skipped_bars: usize,
    pub rejected_signals: usize,
    pub ignored_sells: usize,
    pub trade_log: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
}

impl RunReport {
    pub fn compute(
        summary: &RunSummary,
        trade_log: &[TradeRecord],
        equity_curve: &[EquityPoint],
        risk_free_rate: f64,
    ) -> Self {
        let mut profitable_trades = 0usize;
        let mut unprofitable_trades = 0usize;
        let mut total_profit = 0.0_f64;

        for record in trade_log.iter().filter(|r| r.side == Side::Sell) {
            let profit = record.realized_profit();
            total_profit += profit;
            if profit > 0.0 {
                profitable_trades += 1;
            } else {
                unprofitable_trades += 1;
            }
        }

        let total_trades = trade_log.len();

        RunReport {
            symbol: summary.symbol.clone(),
            interval: summary.interval.clone(),
            start_date: summary.start_date,
            end_date: summary.end_date,
            initial_capital: summary.initial_capital,
            final_cash: summary.final_cash,
            total_trades,
            profitable_trades,
            unprofitable_trades,
            total_profit,
            average_profit: average_profit(total_profit, total_trades),
            max_equity: summary.max_equity,
            max_drawdown: summary.max_drawdown,
            risk_ratio: risk_ratio(trade_log, risk_free_rate),
            bars_processed: summary.bars_processed,
            skipped_bars: summary.skipped_bars,
            rejected_signals: summary.rejected_signals,
            ignored_sells: summary.ignored_sells,
            trade_log: trade_log.to_vec(),
            equity_curve: equity_curve.to_vec(),
        }
    }
}

pub fn average_profit(total_profit: f64, total_trades: usize) -> Option<f64> {
    if total_trades == 0 {
        None
    } else {
        Some(total_profit / total_trades as f64)
    }
}

/// `(mean - risk_free_rate) / stddev` over every record's realized profit,
/// with open legs counted as zero. Returns 0 for fewer than two records or a
/// zero spread.
pub fn risk_ratio(trade_log: &[TradeRecord], risk_free_rate: f64) -> f64 {
    let profits: Vec<f64> = trade_log.iter().map(TradeRecord::realized_profit).collect();
    let stddev = sample_stddev(&profits);
    if stddev <= 0.0 {
        return 0.0;
    }
    (mean(&profits) - risk_free_rate) / stddev
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator), 0 for fewer than two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
