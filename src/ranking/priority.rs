//! "What to practice next" and "recently practiced" lists.

use std::cmp::Ordering;

use crate::attempt::PracticeKey;
use crate::ledger::{LedgerSnapshot, PhonemePracticeData};

/// Default list length for both views.
pub const DEFAULT_LIMIT: usize = 5;

/// Unmastered entries, lowest best score first.
///
/// Ties go to the entry with fewer attempts, then to the smaller key.
/// `0.0` and `-0.0` count as the same score.
pub fn needs_practice(snapshot: &LedgerSnapshot, limit: usize) -> Vec<PhonemePracticeData> {
    let mut candidates: Vec<(&PracticeKey, &PhonemePracticeData)> =
        snapshot.iter().filter(|(_, e)| !e.mastered).collect();

    candidates.sort_by(|(ka, a), (kb, b)| {
        a.best_score
            .partial_cmp(&b.best_score)
            .unwrap_or(Ordering::Equal)
            .then(a.total_attempts.cmp(&b.total_attempts))
            .then_with(|| ka.cmp(kb))
    });

    take_entries(candidates, limit)
}

/// Entries with an attempt timestamp, newest first; ties go to the smaller
/// key.
pub fn recently_practiced(snapshot: &LedgerSnapshot, limit: usize) -> Vec<PhonemePracticeData> {
    let mut candidates: Vec<(&PracticeKey, &PhonemePracticeData)> = snapshot
        .iter()
        .filter(|(_, e)| e.last_attempted.is_some())
        .collect();

    candidates.sort_by(|(ka, a), (kb, b)| match b.last_attempted.cmp(&a.last_attempted) {
        Ordering::Equal => ka.cmp(kb),
        other => other,
    });

    take_entries(candidates, limit)
}

fn take_entries(
    sorted: Vec<(&PracticeKey, &PhonemePracticeData)>,
    limit: usize,
) -> Vec<PhonemePracticeData> {
    sorted
        .into_iter()
        .take(limit)
        .map(|(_, e)| e.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
