//! Historical bar source port trait.

use crate::domain::bar_series::BarSeries;
use crate::domain::error::BacktestError;
use chrono::NaiveDate;

/// A collaborator that supplies ordered bars for one instrument.
pub trait BarSource {
    /// Bars for `symbol` between `start` and `end` inclusive. `interval` is a
    /// label such as `1d`; sources that hold a single interval may ignore it.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> Result<BarSeries, BacktestError>;

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError>;
}
