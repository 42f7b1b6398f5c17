//! Per-column missing-value statistics for one selected sheet.

use serde::{Deserialize, Serialize};

use crate::mapping::SelectedSheet;

use super::round_percentage;

/// Completeness statistics for one column of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStat {
    pub sheet: String,
    pub column: String,
    pub total_rows: usize,
    pub missing_count: usize,
    /// `100 * missing_count / total_rows`, rounded to 2 decimals.
    pub missing_percentage: f64,
    pub non_missing_count: usize,
}

impl ColumnStat {
    /// Build a stat from raw counts. Returns `None` when `total_rows` is zero
    /// or `missing_count` exceeds it.
    pub fn from_counts(
        sheet: impl Into<String>,
        column: impl Into<String>,
        total_rows: usize,
        missing_count: usize,
    ) -> Option<Self> {
        if total_rows == 0 || missing_count > total_rows {
            return None;
        }

        let missing_percentage =
            round_percentage((missing_count as f64 / total_rows as f64) * 100.0);

        Some(Self {
            sheet: sheet.into(),
            column: column.into(),
            total_rows,
            missing_count,
            missing_percentage,
            non_missing_count: total_rows - missing_count,
        })
    }
}

/// Compute one [`ColumnStat`] per resolved column, in resolved order.
///
/// Returns an empty vector for a selection with no rows.
pub fn compute_column_stats(selection: &SelectedSheet) -> Vec<ColumnStat> {
    let table = &selection.table;
    let total_rows = table.row_count();

    selection
        .columns
        .iter()
        .filter_map(|column| {
            let index = table.column_index(column)?;
            ColumnStat::from_counts(
                &selection.sheet,
                column,
                total_rows,
                table.missing_count(index),
            )
        })
        .collect()
}
