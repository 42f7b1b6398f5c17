//! Error types for the gapsheet library.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors for gapsheet operations.
///
/// Unknown sheets or columns in a mapping are not errors; they surface as
/// [`Warning`](crate::Warning)s on the analysis result instead.
#[derive(Debug, Error)]
pub enum GapsheetError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be parsed as a spreadsheet container at all.
    #[error("Unreadable workbook '{name}': {message}")]
    UnreadableWorkbook { name: String, message: String },

    /// A sheet was requested from the accessor that the workbook does not have.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The sheet exists but its contents could not be decoded.
    #[error("Sheet '{sheet}' could not be read: {message}")]
    SheetUnreadable { sheet: String, message: String },

    /// The sheet-to-columns mapping could not be decoded.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the zip library.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failure while assembling an in-memory export.
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for gapsheet operations.
pub type Result<T> = std::result::Result<T, GapsheetError>;
