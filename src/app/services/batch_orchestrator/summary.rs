//! Aggregate results of a conversion batch

use crate::app::services::conversion_engine::{ConversionStats, FileOutcome};
use std::time::Duration;

/// Result of one batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub files_found: usize,
    pub files_converted: usize,
    /// Files stopped by a format or read error, partial output kept
    pub files_aborted: usize,
    /// Files skipped because an output could not be created
    pub files_failed: usize,
    /// Files never admitted because of cancellation
    pub files_cancelled: usize,
    /// Statistics summed over every file that produced output
    pub totals: ConversionStats,
    pub duration: Duration,
    pub variables_loaded: usize,
    /// Per-file outcomes in discovery order
    pub outcomes: Vec<(String, FileOutcome)>,
}

impl BatchSummary {
    /// Build a summary from the per-file outcomes
    pub fn from_outcomes(
        outcomes: Vec<(String, FileOutcome)>,
        variables_loaded: usize,
        duration: Duration,
    ) -> Self {
        let mut summary = Self {
            files_found: outcomes.len(),
            variables_loaded,
            duration,
            ..Self::default()
        };

        for (_, outcome) in &outcomes {
            match outcome {
                FileOutcome::Converted(_) => summary.files_converted += 1,
                FileOutcome::Aborted { .. } => summary.files_aborted += 1,
                FileOutcome::OutputUnavailable(_) => summary.files_failed += 1,
                FileOutcome::Cancelled => summary.files_cancelled += 1,
            }
            if let Some(stats) = outcome.stats() {
                summary.totals.merge(stats);
            }
        }

        summary.outcomes = outcomes;
        summary
    }

    /// Whether the batch was cut short by cancellation
    pub fn was_cancelled(&self) -> bool {
        self.files_cancelled > 0
    }

    /// Whether every discovered file converted cleanly
    pub fn is_clean(&self) -> bool {
        self.files_converted == self.files_found
    }

    /// Outcomes that carry an error, with their file names
    pub fn failures(&self) -> impl Iterator<Item = (&str, &crate::Error)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.error().map(|error| (name.as_str(), error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn converted(trends: usize, logs: usize) -> FileOutcome {
        FileOutcome::Converted(ConversionStats {
            trends_written: trends,
            logs_written: logs,
            ..ConversionStats::default()
        })
    }

    #[test]
    fn test_counts_every_outcome_kind() {
        let outcomes = vec![
            ("a.dat".to_string(), converted(3, 1)),
            ("b.dat".to_string(), converted(2, 0)),
            (
                "c.dat".to_string(),
                FileOutcome::Aborted {
                    stats: ConversionStats {
                        trends_written: 1,
                        ..ConversionStats::default()
                    },
                    error: Error::format("c.dat", 7, "bad timestamp"),
                },
            ),
            (
                "d.dat".to_string(),
                FileOutcome::OutputUnavailable(Error::configuration("unwritable")),
            ),
            ("e.dat".to_string(), FileOutcome::Cancelled),
        ];

        let summary = BatchSummary::from_outcomes(outcomes, 12, Duration::from_secs(1));
        assert_eq!(summary.files_found, 5);
        assert_eq!(summary.files_converted, 2);
        assert_eq!(summary.files_aborted, 1);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.files_cancelled, 1);
        assert_eq!(summary.totals.trends_written, 6);
        assert_eq!(summary.totals.logs_written, 1);
        assert_eq!(summary.variables_loaded, 12);
        assert!(summary.was_cancelled());
        assert!(!summary.is_clean());

        let failed: Vec<_> = summary.failures().map(|(name, _)| name).collect();
        assert_eq!(failed, vec!["c.dat", "d.dat"]);
    }

    #[test]
    fn test_empty_batch_is_clean() {
        let summary = BatchSummary::from_outcomes(Vec::new(), 0, Duration::ZERO);
        assert_eq!(summary.files_found, 0);
        assert!(summary.is_clean());
        assert!(!summary.was_cancelled());
    }
}
