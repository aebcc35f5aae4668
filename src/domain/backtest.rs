//! Bar-replay loop.
//!
//! For every bar from `warmup_period` onwards the strategy is called with the
//! bar's quote, the bars before it, and a ledger snapshot. Returned signals
//! are filled in order and each one is followed by an equity observation.
//! A strategy error skips the bar; nothing inside a bar aborts the run.
//!
//! [`Replay`] advances one bar per [`Replay::step`], so a caller can stop at
//! any bar boundary and still call [`Replay::finish`] for a report.

use chrono::NaiveDate;
use log::{debug, info, warn};

use super::bar_series::BarSeries;
use super::error::BacktestError;
use super::execution::{ExecutionConfig, FillOutcome, execute_signal};
use super::metrics::{DEFAULT_RISK_FREE_RATE, RunReport, RunSummary};
use super::ohlcv::Quote;
use super::portfolio::Ledger;
use super::strategy::Strategy;
use super::tracker::PerformanceTracker;

pub const DEFAULT_WARMUP_PERIOD: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Bar interval label, e.g. `1d`. Informational only.
    pub interval: String,
    pub initial_capital: f64,
    pub risk_free_rate: f64,
    pub warmup_period: usize,
    pub execution: ExecutionConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MAX,
            interval: "1d".to_string(),
            initial_capital: 100_000.0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            warmup_period: DEFAULT_WARMUP_PERIOD,
            execution: ExecutionConfig::default(),
        }
    }
}

/// Final state of a run: the report and the ledger it left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    pub report: RunReport,
    pub ledger: Ledger,
}

pub struct Replay<'a> {
    series: &'a BarSeries,
    strategy: &'a dyn Strategy,
    config: &'a BacktestConfig,
    ledger: Ledger,
    tracker: PerformanceTracker,
    cursor: usize,
    bars_processed: usize,
    skipped_bars: usize,
    rejected_signals: usize,
    ignored_sells: usize,
}

impl<'a> Replay<'a> {
    /// Fails with `InsufficientData` when the series is shorter than the
    /// warmup window.
    pub fn new(
        series: &'a BarSeries,
        strategy: &'a dyn Strategy,
        config: &'a BacktestConfig,
    ) -> Result<Self, BacktestError> {
        if series.len() < config.warmup_period {
            return Err(BacktestError::InsufficientData {
                need: config.warmup_period,
                have: series.len(),
            });
        }

        info!(
            "replaying {} bars of {} with strategy {} (warmup {})",
            series.len() - config.warmup_period,
            series.symbol(),
            strategy.name(),
            config.warmup_period
        );

        Ok(Replay {
            series,
            strategy,
            config,
            ledger: Ledger::new(config.execution.currency.clone(), config.initial_capital),
            tracker: PerformanceTracker::new(config.initial_capital),
            cursor: config.warmup_period,
            bars_processed: 0,
            skipped_bars: 0,
            rejected_signals: 0,
            ignored_sells: 0,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    /// Index of the next bar to replay.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.series.len()
    }

    /// Replay one bar. Returns `false` once every bar has been consumed.
    pub fn step(&mut self) -> bool {
        let i = self.cursor;
        let Some(bar) = self.series.at(i) else {
            return false;
        };
        self.cursor += 1;

        let quote = Quote::from_bar(self.series.symbol(), bar);
        let history = self.series.history(i);

        let signals =
            match self
                .strategy
                .generate_signals(&quote, history, &self.ledger.snapshot())
            {
                Ok(signals) => signals,
                Err(e) => {
                    warn!("bar {} ({}): {}, skipping", i, quote.timestamp, e);
                    self.skipped_bars += 1;
                    return true;
                }
            };

        self.bars_processed += 1;
        debug!(
            "bar {} ({}): close {}, {} signal(s)",
            i,
            quote.timestamp,
            quote.price,
            signals.len()
        );

        for signal in &signals {
            let outcome =
                execute_signal(&mut self.ledger, signal, quote.timestamp, &self.config.execution);
            match outcome {
                FillOutcome::Bought { record, .. } | FillOutcome::Sold { record, .. } => {
                    self.tracker.record_fill(record)
                }
                FillOutcome::NoOpenPosition => self.ignored_sells += 1,
                _ => self.rejected_signals += 1,
            }
            self.tracker.observe(quote.timestamp, self.ledger.available());
        }

        true
    }

    pub fn finish(self) -> BacktestRun {
        let summary = RunSummary {
            symbol: self.series.symbol().to_string(),
            interval: self.config.interval.clone(),
            start_date: self.config.start_date,
            end_date: self.config.end_date,
            initial_capital: self.config.initial_capital,
            final_cash: self.ledger.available(),
            max_equity: self.tracker.max_equity(),
            max_drawdown: self.tracker.max_drawdown(),
            bars_processed: self.bars_processed,
            skipped_bars: self.skipped_bars,
            rejected_signals: self.rejected_signals,
            ignored_sells: self.ignored_sells,
        };

        let report = RunReport::compute(
            &summary,
            self.tracker.trade_log(),
            self.tracker.equity_curve(),
            self.config.risk_free_rate,
        );

        info!(
            "run finished: {} fills, {} skipped bars, cash {:.2}",
            report.total_trades, report.skipped_bars, report.final_cash
        );

        BacktestRun {
            report,
            ledger: self.ledger,
        }
    }
}

/// Replay the whole series and produce a report.
pub fn run_backtest(
    series: &BarSeries,
    strategy: &dyn Strategy,
    config: &BacktestConfig,
) -> Result<BacktestRun, BacktestError> {
    let mut replay = Replay::new(series, strategy, config)?;
    while replay.step() {}
    Ok(replay.finish())
}
