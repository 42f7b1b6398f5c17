//! Missing-value statistics and cross-sheet aggregation.

mod aggregate;
mod calculator;
mod summary;

pub use aggregate::{aggregate, AggregatedStat};
pub use calculator::{compute_column_stats, ColumnStat};
pub use summary::AnalysisSummary;

/// Round a per-column percentage to 2 decimals.
///
/// Rounds the exact binary value half-to-even, so `12.125` becomes `12.12`.
pub(crate) fn round_percentage(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Round an averaged percentage to 2 decimals by scaling, half-to-even.
pub(crate) fn round_mean(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_percentage() {
        assert_eq!(round_percentage(30.0), 30.0);
        assert_eq!(round_percentage(100.0 / 3.0), 33.33);
        assert_eq!(round_percentage(200.0 / 3.0), 66.67);
        assert_eq!(round_percentage(12.125), 12.12);
        assert_eq!(round_percentage(12.375), 12.38);
    }

    #[test]
    fn test_round_mean() {
        assert_eq!(round_mean(40.0), 40.0);
        assert_eq!(round_mean(26.666_666), 26.67);
        assert_eq!(round_mean(0.125), 0.12);
    }
}
