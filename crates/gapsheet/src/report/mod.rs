//! Descriptive reports and the downloadable bundle.
//!
//! Report generation is pluggable through [`ReportGenerator`]. The crate
//! ships two implementations:
//!
//! - [`HtmlProfileGenerator`] - a self-contained HTML completeness profile
//! - [`MockGenerator`] - deterministic text for tests

mod generator;
mod html;
mod mock;
mod package;

pub use generator::{report_title, ReportConfig, ReportError, ReportGenerator};
pub use html::HtmlProfileGenerator;
pub use mock::MockGenerator;
pub use package::{
    aggregated_csv, archive_file_name, report_file_name, summary_csv, ReportBundle,
    AGGREGATED_FILE, SUMMARY_FILE,
};
