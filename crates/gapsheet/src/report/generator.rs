//! Report generator trait and configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::DataTable;

/// Failure to produce a descriptive document for one table.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The generator rejected or could not process the table.
    #[error("report generation failed: {0}")]
    Generation(String),

    /// Formatting error while rendering the document.
    #[error("report formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Configuration for descriptive report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Only describe shape and completeness; skip per-column value samples.
    pub minimal: bool,
    /// Number of distinct sample values to show per column.
    pub sample_values: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            minimal: true,
            sample_values: 5,
        }
    }
}

/// Produces a self-contained descriptive document for a table.
///
/// The engine treats the returned text as opaque; a failure for one sheet is
/// recorded as a warning and never aborts the analysis.
pub trait ReportGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Describe `table` in a document titled `title`.
    fn generate(&self, table: &DataTable, title: &str) -> Result<String, ReportError>;
}

/// Title used for a sheet's report.
pub fn report_title(sheet: &str) -> String {
    format!("Missing Values Analysis - {}", sheet)
}
