//! Dashboard-level aggregate metrics.

use serde::Serialize;

use crate::ledger::LedgerSnapshot;

/// Totals across every ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStats {
    pub total: usize,
    pub mastered: usize,
    pub total_attempts_sum: u64,
    /// Mean best score; `0.0` for an empty ledger.
    pub average_best_score: f64,
    /// `100 * mastered / total`; `0.0` for an empty ledger.
    pub completion_rate_percent: f64,
}

/// Compute [`PracticeStats`] for `snapshot`.
///
/// An empty snapshot yields all zeros, never NaN.
///
/// ```
/// use phoneme_practice::ledger::LedgerSnapshot;
/// use phoneme_practice::ranking::aggregate_stats;
///
/// let stats = aggregate_stats(&LedgerSnapshot::new());
/// assert_eq!(stats.total, 0);
/// assert_eq!(stats.average_best_score, 0.0);
/// assert_eq!(stats.completion_rate_percent, 0.0);
/// ```
pub fn aggregate_stats(snapshot: &LedgerSnapshot) -> PracticeStats {
    let total = snapshot.len();
    let mastered = snapshot.values().filter(|e| e.mastered).count();
    let total_attempts_sum: u64 = snapshot.values().map(|e| u64::from(e.total_attempts)).sum();
    let score_sum: f64 = snapshot.values().map(|e| e.best_score).sum();

    let (average_best_score, completion_rate_percent) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            score_sum / total as f64,
            100.0 * mastered as f64 / total as f64,
        )
    };

    PracticeStats {
        total,
        mastered,
        total_attempts_sum,
        average_best_score,
        completion_rate_percent,
    }
}
