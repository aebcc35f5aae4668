//! Report persistence port trait.

use crate::domain::error::BacktestError;
use crate::domain::metrics::RunReport;
use std::path::Path;

/// Port for writing run reports.
pub trait ReportPort {
    fn write(&self, report: &RunReport, output_path: &Path) -> Result<(), BacktestError>;
}
