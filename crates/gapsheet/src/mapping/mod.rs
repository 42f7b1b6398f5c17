//! Request mapping, validation against the workbook, and warnings.

mod config;
mod validator;
mod warning;

pub use config::SheetColumnMapping;
pub use validator::{validate_mapping, SelectedSheet};
pub use warning::{Validated, Warning, WarningKind};
