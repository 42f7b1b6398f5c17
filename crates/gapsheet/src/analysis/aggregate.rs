//! Cross-sheet aggregation grouped by column name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::calculator::ColumnStat;
use super::round_mean;

/// Totals for one column name across every sheet it was analyzed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStat {
    pub column: String,
    pub total_rows_sum: usize,
    pub missing_count_sum: usize,
    /// Mean of the per-sheet (already rounded) percentages, rounded to 2 decimals.
    pub missing_percentage_mean: f64,
}

#[derive(Default)]
struct Accumulator {
    total_rows: usize,
    missing: usize,
    percentage_sum: f64,
    count: usize,
}

/// Group the summary table by column, in first-appearance order.
///
/// Returns an empty vector when there are fewer than two stats.
pub fn aggregate(stats: &[ColumnStat]) -> Vec<AggregatedStat> {
    if stats.len() <= 1 {
        return Vec::new();
    }

    let mut groups: IndexMap<&str, Accumulator> = IndexMap::new();
    for stat in stats {
        let acc = groups.entry(stat.column.as_str()).or_default();
        acc.total_rows += stat.total_rows;
        acc.missing += stat.missing_count;
        acc.percentage_sum += stat.missing_percentage;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|(column, acc)| AggregatedStat {
            column: column.to_string(),
            total_rows_sum: acc.total_rows,
            missing_count_sum: acc.missing,
            missing_percentage_mean: round_mean(acc.percentage_sum / acc.count as f64),
        })
        .collect()
}
