//! Headline metrics over a summary table.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::calculator::ColumnStat;
use super::round_mean;

/// Headline numbers for a completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Distinct sheets that produced at least one stat.
    pub sheets_processed: usize,
    /// Distinct column names analyzed.
    pub columns_analyzed: usize,
    /// Sum of missing cells over every stat.
    pub total_missing: usize,
    /// Mean of `missing_percentage` over every stat.
    pub mean_missing_percentage: f64,
    /// Missing cells per sheet, in sheet order.
    pub missing_by_sheet: IndexMap<String, usize>,
}

impl AnalysisSummary {
    /// Compute summary metrics from a summary table.
    pub fn from_stats(stats: &[ColumnStat]) -> Self {
        let mut missing_by_sheet: IndexMap<String, usize> = IndexMap::new();
        let mut columns: HashSet<&str> = HashSet::new();

        for stat in stats {
            *missing_by_sheet.entry(stat.sheet.clone()).or_insert(0) += stat.missing_count;
            columns.insert(&stat.column);
        }

        let mean_missing_percentage = if stats.is_empty() {
            0.0
        } else {
            let sum: f64 = stats.iter().map(|s| s.missing_percentage).sum();
            round_mean(sum / stats.len() as f64)
        };

        Self {
            sheets_processed: missing_by_sheet.len(),
            columns_analyzed: columns.len(),
            total_missing: stats.iter().map(|s| s.missing_count).sum(),
            mean_missing_percentage,
            missing_by_sheet,
        }
    }
}
