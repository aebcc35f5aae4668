//! JSON run report writer.

use crate::domain::error::BacktestError;
use crate::domain::metrics::RunReport;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(report: &RunReport) -> Result<String, BacktestError> {
        serde_json::to_string_pretty(report).map_err(|e| BacktestError::Report {
            reason: format!("failed to serialize report: {e}"),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &RunReport, output_path: &Path) -> Result<(), BacktestError> {
        let json = Self::render(report)?;
        fs::write(output_path, json)?;
        Ok(())
    }
}
