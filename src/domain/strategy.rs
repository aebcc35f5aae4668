//! Strategy capability consumed by the replay loop.
//!
//! A strategy sees the current quote, the bars strictly before it, and a
//! read-only portfolio snapshot. It returns zero or more signals for the
//! current bar, or a [`StrategyError`] that the loop logs and skips.

use super::error::StrategyError;
use super::ohlcv::{Bar, Quote};
use super::portfolio::PortfolioSnapshot;
use super::signal::Signal;

pub trait Strategy {
    fn name(&self) -> &str;

    fn generate_signals(
        &self,
        quote: &Quote,
        history: &[Bar],
        portfolio: &PortfolioSnapshot<'_>,
    ) -> Result<Vec<Signal>, StrategyError>;
}

/// Adapts a closure into a [`Strategy`].
pub struct FnStrategy<F> {
    name: String,
    f: F,
}

pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnStrategy<F>
where
    F: Fn(&Quote, &[Bar], &PortfolioSnapshot<'_>) -> Result<Vec<Signal>, StrategyError>,
{
    FnStrategy {
        name: name.into(),
        f,
    }
}

impl<F> Strategy for FnStrategy<F>
where
    F: Fn(&Quote, &[Bar], &PortfolioSnapshot<'_>) -> Result<Vec<Signal>, StrategyError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(
        &self,
        quote: &Quote,
        history: &[Bar],
        portfolio: &PortfolioSnapshot<'_>,
    ) -> Result<Vec<Signal>, StrategyError> {
        (self.f)(quote, history, portfolio)
    }
}
