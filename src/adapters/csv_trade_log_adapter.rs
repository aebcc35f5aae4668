//! CSV trade log writer: one row per fill.

use crate::domain::error::BacktestError;
use crate::domain::metrics::RunReport;
use crate::domain::position::TradeRecord;
use crate::ports::report_port::ReportPort;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
pub struct CsvTradeLogAdapter;

impl CsvTradeLogAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records<W: Write>(records: &[TradeRecord], writer: W) -> Result<(), BacktestError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in records {
            wtr.serialize(record).map_err(|e| BacktestError::Report {
                reason: format!("failed to write trade row: {e}"),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvTradeLogAdapter {
    fn write(&self, report: &RunReport, output_path: &Path) -> Result<(), BacktestError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_records(&report.trade_log, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Position;
    use chrono::NaiveDate;

    fn records() -> Vec<TradeRecord> {
        let pos = Position {
            symbol: "SBER".into(),
            quantity: 10,
            average_price: 100.0,
            open_time: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        let close = NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        vec![TradeRecord::opened(&pos), TradeRecord::closed(&pos, 110.0, close)]
    }

    #[test]
    fn writes_header_and_one_row_per_fill() {
        let mut buf = Vec::new();
        CsvTradeLogAdapter::write_records(&records(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "symbol,side,quantity,open_price,open_time,close_price,close_time,profit"
        );
        assert!(lines[1].starts_with("SBER,buy,10,100.0,2024-01-02T00:00:00,,,"));
        assert!(lines[2].ends_with(",110.0,2024-01-03T00:00:00,100.0"));
    }

    #[test]
    fn empty_log_writes_nothing() {
        let mut buf = Vec::new();
        CsvTradeLogAdapter::write_records(&[], &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
