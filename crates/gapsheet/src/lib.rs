//! Gapsheet: missing-value analysis for multi-sheet spreadsheet workbooks.
//!
//! Given a workbook and a mapping of sheet name to the columns of interest,
//! gapsheet validates the request against the workbook, computes per-column
//! completeness statistics, aggregates them across sheets and packages the
//! results as CSV summaries, per-sheet HTML reports and a zip archive.
//!
//! # Core Principles
//!
//! - **Skip and warn**: unknown sheets or columns never abort a run
//! - **Read-only**: the workbook is never modified
//! - **Deterministic**: the same input always yields byte-identical output
//!
//! # Example
//!
//! ```no_run
//! use gapsheet::{Gapsheet, SheetColumnMapping};
//!
//! let mapping = SheetColumnMapping::from_json_str(
//!     r#"{"Sheet1": ["Asset", "Super Reason"]}"#,
//! ).unwrap();
//!
//! let outcome = Gapsheet::new().analyze_path("assets.xlsx", &mapping).unwrap();
//! if let Some(result) = outcome.result() {
//!     println!("{}", result.bundle.summary_csv);
//! }
//! for warning in outcome.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//! ```

pub mod analysis;
pub mod error;
pub mod input;
pub mod mapping;
pub mod report;

mod gapsheet;

pub use crate::gapsheet::{AnalysisOutcome, AnalysisResult, Gapsheet, GapsheetConfig};
pub use analysis::{AggregatedStat, AnalysisSummary, ColumnStat};
pub use error::{GapsheetError, Result};
pub use input::{CellValue, DataTable, MissingPolicy, ReaderConfig, SourceMetadata, Workbook};
pub use mapping::{SelectedSheet, SheetColumnMapping, Validated, Warning, WarningKind};
pub use report::{
    HtmlProfileGenerator, MockGenerator, ReportBundle, ReportConfig, ReportError, ReportGenerator,
};
