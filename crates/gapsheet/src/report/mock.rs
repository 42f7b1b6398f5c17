//! Mock report generator for testing.

use crate::input::DataTable;

use super::generator::{ReportError, ReportGenerator};

/// Report generator that returns predictable text, optionally failing for
/// selected titles.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    fail_when_title_contains: Vec<String>,
}

impl MockGenerator {
    /// Create a new mock generator that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail for any title containing `fragment`.
    pub fn failing_on(mut self, fragment: impl Into<String>) -> Self {
        self.fail_when_title_contains.push(fragment.into());
        self
    }
}

impl ReportGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    fn generate(&self, table: &DataTable, title: &str) -> Result<String, ReportError> {
        if self
            .fail_when_title_contains
            .iter()
            .any(|fragment| title.contains(fragment.as_str()))
        {
            return Err(ReportError::Generation(format!(
                "mock failure for '{}'",
                title
            )));
        }

        Ok(format!(
            "<html><title>{}</title><body>rows={} columns={}</body></html>",
            title,
            table.row_count(),
            table.headers.join("|")
        ))
    }
}
