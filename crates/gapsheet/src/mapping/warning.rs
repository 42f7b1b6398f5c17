//! Non-fatal warnings and the result type that carries them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What caused a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The requested sheet is not in the workbook.
    SheetNotFound,
    /// Some requested columns are not in the sheet.
    ColumnsNotFound,
    /// The selected table had no rows.
    EmptySelection,
    /// The report generator failed for a sheet.
    DocumentGenerationFailed,
    /// The sheet exists but could not be decoded.
    SheetUnreadable,
}

impl WarningKind {
    /// Get a human-readable label for the warning kind.
    pub fn label(&self) -> &'static str {
        match self {
            WarningKind::SheetNotFound => "Sheet Not Found",
            WarningKind::ColumnsNotFound => "Columns Not Found",
            WarningKind::EmptySelection => "Empty Selection",
            WarningKind::DocumentGenerationFailed => "Document Generation Failed",
            WarningKind::SheetUnreadable => "Sheet Unreadable",
        }
    }
}

/// A recoverable problem encountered while processing one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// Sheet the warning refers to.
    pub sheet: String,
    /// Columns involved, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// The requested sheet is not in the workbook.
    pub fn sheet_not_found(sheet: impl Into<String>) -> Self {
        let sheet = sheet.into();
        Self {
            kind: WarningKind::SheetNotFound,
            message: format!("Sheet '{}' not found in workbook", sheet),
            sheet,
            columns: Vec::new(),
        }
    }

    /// Some requested columns are absent from `sheet`.
    pub fn columns_not_found(sheet: impl Into<String>, columns: Vec<String>) -> Self {
        let sheet = sheet.into();
        Self {
            kind: WarningKind::ColumnsNotFound,
            message: format!(
                "Columns not found in sheet '{}': {}",
                sheet,
                columns.join(", ")
            ),
            sheet,
            columns,
        }
    }

    /// The resolved columns of `sheet` have no data rows.
    pub fn empty_selection(sheet: impl Into<String>, columns: Vec<String>) -> Self {
        let sheet = sheet.into();
        Self {
            kind: WarningKind::EmptySelection,
            message: format!("Sheet '{}' has no rows for the selected columns", sheet),
            sheet,
            columns,
        }
    }

    /// The report generator failed for `sheet`.
    pub fn document_failed(sheet: impl Into<String>, reason: impl fmt::Display) -> Self {
        let sheet = sheet.into();
        Self {
            kind: WarningKind::DocumentGenerationFailed,
            message: format!("Error generating report for '{}': {}", sheet, reason),
            sheet,
            columns: Vec::new(),
        }
    }

    /// `sheet` exists but could not be decoded.
    pub fn sheet_unreadable(sheet: impl Into<String>, reason: impl fmt::Display) -> Self {
        let sheet = sheet.into();
        Self {
            kind: WarningKind::SheetUnreadable,
            message: format!("Error processing sheet '{}': {}", sheet, reason),
            sheet,
            columns: Vec::new(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A value together with the warnings accumulated while producing it.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Validated<T> {
    /// Wrap a value with no warnings.
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Whether any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Transform the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Split into value and warnings.
    pub fn into_parts(self) -> (T, Vec<Warning>) {
        (self.value, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_not_found_message() {
        let w = Warning::columns_not_found("S1", vec!["Z".into(), "Y".into()]);
        assert_eq!(w.kind, WarningKind::ColumnsNotFound);
        assert_eq!(w.message, "Columns not found in sheet 'S1': Z, Y");
        assert_eq!(w.columns, vec!["Z", "Y"]);
    }

    #[test]
    fn test_validated_map_keeps_warnings() {
        let mut v = Validated::new(2);
        v.warn(Warning::sheet_not_found("Missing"));
        let mapped = v.map(|x| x * 10);

        assert_eq!(mapped.value, 20);
        assert!(mapped.has_warnings());
        assert_eq!(mapped.warnings[0].sheet, "Missing");
    }
}
