//! Workbook access and the typed table abstraction.

mod source;
mod workbook;

pub use source::{CellValue, DataTable, MissingPolicy, SourceMetadata};
pub use workbook::{ReaderConfig, Workbook};
