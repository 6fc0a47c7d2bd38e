//! Shared, thread-safe mastery ledger.
//!
//! [`MasteryLedger`] serialises updates per [`PracticeKey`]: each key owns a
//! slot behind its own mutex, and the map of slots sits behind a
//! `RwLock` that is only held long enough to find or insert a slot.  Two
//! attempts for the same key are folded one after the other; attempts for
//! different keys never wait on each other's fold.
//!
//! ```text
//! RwLock<HashMap<PracticeKey, Arc<Mutex<Option<PhonemePracticeData>>>>>
//!                  │                       │
//!                  │                       └─ per-key critical section
//!                  └─ lookup / lazy insert only
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::attempt::{AttemptRecord, PracticeKey};
use crate::error::ValidationError;

use super::entry::{fold_attempt, PhonemePracticeData};
use super::policy::MasteryPolicy;
use super::snapshot::LedgerSnapshot;

/// A slot is `None` until its first attempt has been folded in; empty slots
/// never show up in snapshots.
type Slot = Arc<Mutex<Option<PhonemePracticeData>>>;

// ---------------------------------------------------------------------------
// LedgerUpdate
// ---------------------------------------------------------------------------

/// Result of folding one attempt into the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpdate {
    /// The entry after the update.
    pub entry: PhonemePracticeData,
    /// `true` when this attempt flipped the entry to mastered.
    pub newly_mastered: bool,
}

// ---------------------------------------------------------------------------
// MasteryLedger
// ---------------------------------------------------------------------------

/// Keyed store of per-phoneme practice statistics.
///
/// Cheap to share: wrap in an `Arc` and call [`update`](Self::update) from
/// any thread or task.
pub struct MasteryLedger {
    slots: RwLock<HashMap<PracticeKey, Slot>>,
    policy: MasteryPolicy,
}

impl MasteryLedger {
    /// An empty ledger.
    pub fn new(policy: MasteryPolicy) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// A ledger seeded from a previously saved snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot, policy: MasteryPolicy) -> Self {
        let slots = Vec::<PhonemePracticeData>::from(snapshot)
            .into_iter()
            .filter_map(|entry| {
                let key = entry.key().ok()?;
                Some((key, Arc::new(Mutex::new(Some(entry)))))
            })
            .collect();

        Self {
            slots: RwLock::new(slots),
            policy,
        }
    }

    pub fn policy(&self) -> &MasteryPolicy {
        &self.policy
    }

    /// Fold `attempt` into the entry for its key, creating the entry on the
    /// first attempt.
    ///
    /// # Errors
    ///
    /// Propagates [`fold_attempt`] validation failures; the ledger is left
    /// unchanged in that case.
    pub fn update(&self, attempt: &AttemptRecord) -> Result<LedgerUpdate, ValidationError> {
        let slot = self.slot(attempt.key());
        let mut current = slot.lock();

        let entry = fold_attempt(current.as_ref(), attempt, &self.policy)?;
        let was_mastered = current.as_ref().is_some_and(|e| e.mastered);
        let newly_mastered = entry.mastered && !was_mastered;

        log::debug!(
            "ledger: {} attempt #{} score={:.3} best={:.3}",
            attempt.key(),
            entry.total_attempts,
            attempt.score(),
            entry.best_score
        );
        if newly_mastered {
            log::info!(
                "ledger: {} mastered after {} attempts",
                attempt.key(),
                entry.total_attempts
            );
        }

        *current = Some(entry.clone());
        Ok(LedgerUpdate {
            entry,
            newly_mastered,
        })
    }

    /// Current entry for `key`, if it has been practiced.
    pub fn get(&self, key: &PracticeKey) -> Option<PhonemePracticeData> {
        let slot = self.slots.read().get(key).cloned()?;
        let entry = slot.lock().clone();
        entry
    }

    /// Point-in-time copy of every practiced entry.
    ///
    /// Each entry is read under its own lock, so the copy never contains a
    /// half-applied update.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let slots: Vec<(PracticeKey, Slot)> = self
            .slots
            .read()
            .iter()
            .map(|(k, s)| (k.clone(), Arc::clone(s)))
            .collect();

        let mut snapshot = LedgerSnapshot::new();
        for (key, slot) in slots {
            if let Some(entry) = slot.lock().clone() {
                snapshot.insert_validated(key, entry);
            }
        }
        snapshot
    }

    /// Number of practiced keys.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|s| s.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &PracticeKey) -> Slot {
        if let Some(slot) = self.slots.read().get(key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

impl Default for MasteryLedger {
    fn default() -> Self {
        Self::new(MasteryPolicy::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn key(phoneme: &str, word: &str) -> PracticeKey {
        PracticeKey::new(phoneme, word).unwrap()
    }

    fn attempt(k: &PracticeKey, score: f64) -> AttemptRecord {
        AttemptRecord::build(k.clone(), score, vec![], None).unwrap()
    }

    #[test]
    fn unpracticed_key_is_absent() {
        let ledger = MasteryLedger::default();
        assert!(ledger.get(&key("æ", "cat")).is_none());
        assert!(ledger.is_empty());
        assert!(ledger.snapshot().is_empty());
    }

    #[test]
    fn scenario_three_attempts() {
        let ledger = MasteryLedger::default();
        let k = key("æ", "cat");
        for s in [0.4, 0.7, 0.6] {
            ledger.update(&attempt(&k, s)).unwrap();
        }
        let entry = ledger.get(&k).unwrap();
        assert_eq!(entry.best_score, 0.7);
        assert_eq!(entry.total_attempts, 3);
        assert!(!entry.mastered);
    }

    #[test]
    fn reports_mastery_transition_once() {
        let ledger = MasteryLedger::default();
        let k = key("θ", "think");
        assert!(!ledger.update(&attempt(&k, 0.5)).unwrap().newly_mastered);
        assert!(ledger.update(&attempt(&k, 0.95)).unwrap().newly_mastered);
        let after = ledger.update(&attempt(&k, 0.1)).unwrap();
        assert!(!after.newly_mastered);
        assert!(after.entry.mastered);
    }

    #[test]
    fn recency_tracks_last_recorded_attempt() {
        let ledger = MasteryLedger::default();
        let k = key("æ", "cat");
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for (i, s) in [0.9, 0.1].iter().enumerate() {
            let a = AttemptRecord::build(k.clone(), *s, vec![], Some(t + Duration::seconds(i as i64)))
                .unwrap();
            ledger.update(&a).unwrap();
        }
        assert_eq!(ledger.get(&k).unwrap().last_attempted, Some(t + Duration::seconds(1)));
    }

    #[test]
    fn seeds_from_snapshot() {
        let first = MasteryLedger::default();
        let k = key("æ", "cat");
        first.update(&attempt(&k, 0.5)).unwrap();

        let second = MasteryLedger::from_snapshot(first.snapshot(), MasteryPolicy::default());
        second.update(&attempt(&k, 0.6)).unwrap();

        let entry = second.get(&k).unwrap();
        assert_eq!(entry.total_attempts, 2);
        assert_eq!(entry.best_score, 0.6);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn concurrent_updates_to_one_key_are_not_lost() {
        let ledger = Arc::new(MasteryLedger::default());
        let k = key("æ", "cat");

        std::thread::scope(|scope| {
            for t in 0..8 {
                let ledger = Arc::clone(&ledger);
                let k = k.clone();
                scope.spawn(move || {
                    for i in 0..100 {
                        let score = ((t * 100 + i) % 90) as f64 / 100.0;
                        ledger.update(&attempt(&k, score)).unwrap();
                    }
                });
            }
        });

        let entry = ledger.get(&k).unwrap();
        assert_eq!(entry.total_attempts, 800);
        assert_eq!(entry.best_score, 0.89);
    }

    #[test]
    fn concurrent_updates_to_many_keys() {
        let ledger = Arc::new(MasteryLedger::default());
        let words = ["cat", "hat", "bat", "mat"];

        std::thread::scope(|scope| {
            for w in words {
                let ledger = Arc::clone(&ledger);
                scope.spawn(move || {
                    let k = key("æ", w);
                    for _ in 0..50 {
                        ledger.update(&attempt(&k, 0.3)).unwrap();
                    }
                });
            }
        });

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.values().all(|e| e.total_attempts == 50));
    }

    #[test]
    fn ledger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MasteryLedger>();
    }
}
