//! CSV file bar source.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with the header
//! `timestamp,open,high,low,close,volume`. Rows are numbered from 1 after the
//! header when reporting malformed data.

use crate::domain::bar_series::{BarRecord, BarSeries};
use crate::domain::error::BacktestError;
use crate::ports::data_port::BarSource;
use chrono::NaiveDate;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

/// Read every row from `reader` into a series. Any malformed row aborts.
pub fn read_bars<R: Read>(symbol: &str, reader: R) -> Result<BarSeries, BacktestError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for (i, result) in rdr.deserialize::<BarRecord>().enumerate() {
        let record = result.map_err(|e| BacktestError::DataFormat {
            row: i + 1,
            field: "record".to_string(),
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    BarSeries::load(symbol, records)
}

impl BarSource for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        _interval: &str,
    ) -> Result<BarSeries, BacktestError> {
        let path = self.csv_path(symbol);
        let file = fs::File::open(&path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("failed to read {}: {}", path.display(), e))
        })?;

        let all = read_bars(symbol, file)?;
        let in_range = all
            .iter()
            .filter(|bar| bar.date() >= start && bar.date() <= end)
            .cloned()
            .collect();

        BarSeries::new(symbol, in_range)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "failed to read directory {}: {}",
                    self.base_path.display(),
                    e
                ),
            )
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
