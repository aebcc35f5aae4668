//! Ordered, read-only bar sequence for one instrument.
//!
//! Construction is the only place ordering is checked: once a `BarSeries`
//! exists its timestamps are strictly ascending. History handed to a strategy
//! at step `i` is `&bars[..i]`, so nothing at or after `i` is reachable.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::error::BacktestError;
use super::ohlcv::Bar;

/// One unparsed row of bar data as delivered by a data collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BarRecord {
    pub timestamp: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from typed bars. Duplicate or descending timestamps are
    /// rejected.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BacktestError> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(BacktestError::UnorderedBars {
                    row: i + 2,
                    previous: pair[0].timestamp,
                    current: pair[1].timestamp,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Parse raw records into a series. The first malformed field aborts the
    /// whole load; rows are numbered from 1.
    pub fn load<I>(symbol: impl Into<String>, records: I) -> Result<Self, BacktestError>
    where
        I: IntoIterator<Item = BarRecord>,
    {
        let bars = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| parse_record(i + 1, &record))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn at(&self, i: usize) -> Option<&Bar> {
        self.bars.get(i)
    }

    /// Bars strictly before index `i`.
    pub fn history(&self, i: usize) -> &[Bar] {
        &self.bars[..i.min(self.bars.len())]
    }

    /// The last `n` bars strictly before index `i`.
    pub fn window(&self, i: usize, n: usize) -> Result<&[Bar], BacktestError> {
        let history = self.history(i);
        if n > history.len() {
            return Err(BacktestError::InsufficientData {
                need: n,
                have: history.len(),
            });
        }
        Ok(&history[history.len() - n..])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|b| b.timestamp)
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

/// Accepts `YYYY-MM-DD`, `YYYYMMDD`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS`, or integer unix seconds.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN));
    }
    let secs: i64 = value.parse().ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

fn parse_record(row: usize, record: &BarRecord) -> Result<Bar, BacktestError> {
    let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| {
        BacktestError::data_format(
            row,
            "timestamp",
            format!("unrecognised timestamp '{}'", record.timestamp),
        )
    })?;

    Ok(Bar {
        timestamp,
        open: parse_number(row, "open", &record.open)?,
        high: parse_number(row, "high", &record.high)?,
        low: parse_number(row, "low", &record.low)?,
        close: parse_number(row, "close", &record.close)?,
        volume: parse_number(row, "volume", &record.volume)?,
    })
}

fn parse_number(row: usize, field: &str, value: &str) -> Result<f64, BacktestError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|e| BacktestError::data_format(row, field, format!("'{value}': {e}")))?;
    if !parsed.is_finite() {
        return Err(BacktestError::data_format(
            row,
            field,
            format!("'{value}' is not a finite number"),
        ));
    }
    Ok(parsed)
}
