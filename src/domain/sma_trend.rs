//! Simple trend-following reference strategy.
//!
//! SMA(n) is taken over the last n closes of the history, which never
//! includes the current bar. Price above the average buys, below sells,
//! equal does nothing.

use super::error::StrategyError;
use super::ohlcv::{Bar, Quote};
use super::portfolio::PortfolioSnapshot;
use super::signal::Signal;
use super::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct SmaTrend {
    pub period: usize,
}

impl SmaTrend {
    pub fn new(period: usize) -> Self {
        SmaTrend { period }
    }
}

/// Mean close of the last `period` bars, or `None` if there are fewer.
pub fn sma(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let window = &bars[bars.len() - period..];
    Some(window.iter().map(|b| b.close).sum::<f64>() / period as f64)
}

impl Strategy for SmaTrend {
    fn name(&self) -> &str {
        "sma_trend"
    }

    fn generate_signals(
        &self,
        quote: &Quote,
        history: &[Bar],
        _portfolio: &PortfolioSnapshot<'_>,
    ) -> Result<Vec<Signal>, StrategyError> {
        let average = sma(history, self.period)
            .ok_or_else(|| StrategyError::insufficient_history(self.period, history.len()))?;

        let signals = if quote.price > average {
            vec![Signal::buy(quote.symbol.clone(), quote.price)]
        } else if quote.price < average {
            vec![Signal::sell(quote.symbol.clone(), quote.price)]
        } else {
            Vec::new()
        };
        Ok(signals)
    }
}
