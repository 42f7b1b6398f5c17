//! Resolve a requested mapping against the workbook's actual contents.

use tracing::{debug, warn};

use crate::input::{DataTable, Workbook};

use super::config::SheetColumnMapping;
use super::warning::{Validated, Warning};

/// A sheet whose requested columns resolved to a non-empty table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSheet {
    /// Sheet name.
    pub sheet: String,
    /// Requested columns that exist, in requested order.
    pub columns: Vec<String>,
    /// The sheet restricted to `columns`.
    pub table: DataTable,
}

impl SelectedSheet {
    /// Number of data rows in the selection.
    pub fn total_rows(&self) -> usize {
        self.table.row_count()
    }
}

/// Resolve each `(sheet, columns)` entry of the mapping, in order.
///
/// Unknown sheets and columns are reported as warnings and skipped; this
/// function never fails.
pub fn validate_mapping(
    workbook: &mut Workbook,
    mapping: &SheetColumnMapping,
) -> Validated<Vec<SelectedSheet>> {
    let mut result = Validated::new(Vec::new());

    for (sheet, requested) in mapping.iter() {
        if !workbook.has_sheet(sheet) {
            record(&mut result, Warning::sheet_not_found(sheet));
            continue;
        }

        let table = match workbook.load_sheet(sheet) {
            Ok(table) => table,
            Err(e) => {
                record(&mut result, Warning::sheet_unreadable(sheet, e));
                continue;
            }
        };

        let requested = dedup_columns(requested);
        let (available, missing): (Vec<String>, Vec<String>) = requested
            .into_iter()
            .partition(|col| table.has_column(col));

        if !missing.is_empty() {
            record(&mut result, Warning::columns_not_found(sheet, missing));
        }
        if available.is_empty() {
            continue;
        }

        let selected = table.select(&available);
        if selected.is_empty() {
            debug!(sheet, "selection has no rows, skipping");
            result.warn(Warning::empty_selection(sheet, available));
            continue;
        }

        result.value.push(SelectedSheet {
            sheet: sheet.to_string(),
            columns: available,
            table: selected,
        });
    }

    result
}

fn record(result: &mut Validated<Vec<SelectedSheet>>, warning: Warning) {
    warn!(kind = ?warning.kind, sheet = %warning.sheet, "{}", warning.message);
    result.warn(warning);
}

/// Keep the first occurrence of each requested column.
fn dedup_columns(columns: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(columns.len());
    for col in columns {
        if !out.contains(col) {
            out.push(col.clone());
        }
    }
    out
}
