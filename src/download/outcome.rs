//! Per-item download outcomes and batch aggregates.

use std::fmt;
use std::path::PathBuf;

use crate::queue::Selection;

/// Skip reason for items without a URL.
pub const SKIP_UNRESOLVED: &str = "unresolved";

/// Skip reason when the master download switch is off.
pub const SKIP_DOWNLOADS_DISABLED: &str = "downloads disabled";

/// Skip reason when the item's source is switched off.
pub const SKIP_SOURCE_DISABLED: &str = "source disabled";

/// Skip reason for items not started before a stop request.
pub const SKIP_STOPPED: &str = "stopped";

/// Result of one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was written to this path.
    Success(PathBuf),
    /// The download was attempted and failed.
    Failed(String),
    /// The item was never attempted.
    Skipped(String),
}

impl DownloadOutcome {
    /// Returns true for [`DownloadOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for [`DownloadOutcome::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true for [`DownloadOutcome::Skipped`].
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub(crate) fn skipped(reason: &str) -> Self {
        Self::Skipped(reason.to_string())
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(path) => write!(f, "saved {}", path.display()),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// Counts for one batch. `success + failed + skipped == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStatistics {
    /// Items submitted.
    pub total: usize,
    /// Items written to disk.
    pub success: usize,
    /// Items attempted and failed.
    pub failed: usize,
    /// Items not attempted.
    pub skipped: usize,
}

impl BatchStatistics {
    /// Tallies `outcomes`; every outcome lands in exactly one bucket.
    #[must_use]
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                total: outcomes.len(),
                ..Self::default()
            },
            |mut stats, outcome| {
                match outcome {
                    DownloadOutcome::Success(_) => stats.success += 1,
                    DownloadOutcome::Failed(_) => stats.failed += 1,
                    DownloadOutcome::Skipped(_) => stats.skipped += 1,
                }
                stats
            },
        )
    }
}

impl fmt::Display for BatchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} downloaded, {} failed, {} skipped",
            self.total, self.success, self.failed, self.skipped
        )
    }
}

/// Outcomes of a batch in input order, plus their tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// One outcome per submitted item, in submission order.
    pub outcomes: Vec<DownloadOutcome>,
    /// Tally of `outcomes`.
    pub stats: BatchStatistics,
}

impl BatchReport {
    /// Builds a report, computing the statistics.
    #[must_use]
    pub fn new(outcomes: Vec<DownloadOutcome>) -> Self {
        let stats = BatchStatistics::from_outcomes(&outcomes);
        Self { outcomes, stats }
    }

    /// Queue indices of successful items, for a batch built from
    /// `selection` (outcome `i` belongs to the `i`-th selected index).
    #[must_use]
    pub fn successful_indices(&self, selection: &Selection) -> Vec<usize> {
        selection
            .iter()
            .zip(&self.outcomes)
            .filter(|(_, outcome)| outcome.is_success())
            .map(|(index, _)| index)
            .collect()
    }

    /// Failed items as `(position in batch, reason)`.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, outcome)| match outcome {
                DownloadOutcome::Failed(reason) => Some((i, reason.as_str())),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DownloadOutcome> {
        vec![
            DownloadOutcome::Success(PathBuf::from("/m/a.mp3")),
            DownloadOutcome::Failed("HTTP 500".to_string()),
            DownloadOutcome::skipped(SKIP_UNRESOLVED),
            DownloadOutcome::Success(PathBuf::from("/m/b.mp3")),
        ]
    }

    #[test]
    fn test_statistics_buckets_sum_to_total() {
        let stats = BatchStatistics::from_outcomes(&sample());
        assert_eq!(
            stats,
            BatchStatistics {
                total: 4,
                success: 2,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(stats.success + stats.failed + stats.skipped, stats.total);
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(BatchReport::new(Vec::new()).stats, BatchStatistics::default());
    }

    #[test]
    fn test_successful_indices_map_back_to_queue() {
        let selection: Selection = [1, 4, 6, 9].into_iter().collect();
        let report = BatchReport::new(sample());
        assert_eq!(report.successful_indices(&selection), vec![1, 9]);
    }

    #[test]
    fn test_failures_lists_reasons() {
        let report = BatchReport::new(sample());
        assert_eq!(report.failures().collect::<Vec<_>>(), vec![(1, "HTTP 500")]);
    }

    #[test]
    fn test_display() {
        let stats = BatchStatistics::from_outcomes(&sample());
        assert_eq!(stats.to_string(), "4 total, 2 downloaded, 1 failed, 1 skipped");
        assert_eq!(
            DownloadOutcome::skipped(SKIP_STOPPED).to_string(),
            "skipped (stopped)"
        );
    }
}
