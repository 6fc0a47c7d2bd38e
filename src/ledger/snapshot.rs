//! Read-only ledger snapshot: the value exchanged with the persistent store
//! and handed to the rankers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attempt::{AttemptRecord, PracticeKey};
use crate::error::ValidationError;

use super::entry::{fold_attempt, PhonemePracticeData};
use super::policy::MasteryPolicy;

/// All ledger entries keyed by [`PracticeKey`].
///
/// Serialises as a plain list of entries (each entry carries its own phoneme
/// and word); deserialising validates every entry and rejects duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<PhonemePracticeData>",
    into = "Vec<PhonemePracticeData>"
)]
pub struct LedgerSnapshot {
    entries: BTreeMap<PracticeKey, PhonemePracticeData>,
}

impl LedgerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from stored entries.
    ///
    /// # Errors
    ///
    /// Any entry failing [`PhonemePracticeData::validate`], or two entries
    /// with the same key.
    pub fn from_entries(
        entries: impl IntoIterator<Item = PhonemePracticeData>,
    ) -> Result<Self, ValidationError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            entry.validate()?;
            let key = entry.key()?;
            if map.contains_key(&key) {
                return Err(ValidationError::DuplicateEntry {
                    phoneme: entry.phoneme,
                    word: entry.word,
                });
            }
            map.insert(key, entry);
        }
        Ok(Self { entries: map })
    }

    /// Pure update: a new snapshot with `attempt` folded into its key's
    /// entry.  `self` is left untouched.
    pub fn with_attempt(
        &self,
        attempt: &AttemptRecord,
        policy: &MasteryPolicy,
    ) -> Result<Self, ValidationError> {
        let updated = fold_attempt(self.entries.get(attempt.key()), attempt, policy)?;
        let mut next = self.clone();
        next.entries.insert(attempt.key().clone(), updated);
        Ok(next)
    }

    pub fn get(&self, key: &PracticeKey) -> Option<&PhonemePracticeData> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PracticeKey, &PhonemePracticeData)> {
        self.entries.iter()
    }

    /// Entries in key order, without keys.
    pub fn values(&self) -> impl Iterator<Item = &PhonemePracticeData> {
        self.entries.values()
    }

    /// Used by [`MasteryLedger`](super::MasteryLedger) when assembling a
    /// snapshot from already-validated slots.
    pub(crate) fn insert_validated(&mut self, key: PracticeKey, entry: PhonemePracticeData) {
        self.entries.insert(key, entry);
    }
}

impl TryFrom<Vec<PhonemePracticeData>> for LedgerSnapshot {
    type Error = ValidationError;

    fn try_from(entries: Vec<PhonemePracticeData>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<LedgerSnapshot> for Vec<PhonemePracticeData> {
    fn from(snapshot: LedgerSnapshot) -> Self {
        snapshot.entries.into_values().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(phoneme: &str, word: &str, best: f64, attempts: u32) -> PhonemePracticeData {
        PhonemePracticeData {
            phoneme: phoneme.into(),
            word: word.into(),
            best_score: best,
            total_attempts: attempts,
            mastered: false,
            last_attempted: None,
        }
    }

    fn attempt(phoneme: &str, word: &str, score: f64) -> AttemptRecord {
        AttemptRecord::build(PracticeKey::new(phoneme, word).unwrap(), score, vec![], None)
            .unwrap()
    }

    #[test]
    fn empty_snapshot() {
        let s = LedgerSnapshot::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn with_attempt_creates_entry_lazily() {
        let s = LedgerSnapshot::new();
        let key = PracticeKey::new("θ", "think").unwrap();
        assert!(s.get(&key).is_none());

        let next = s.with_attempt(&attempt("θ", "think", 0.5), &MasteryPolicy::default()).unwrap();
        assert!(s.is_empty(), "original snapshot must be untouched");
        assert_eq!(next.get(&key).unwrap().total_attempts, 1);
    }

    #[test]
    fn with_attempt_updates_only_its_key() {
        let policy = MasteryPolicy::default();
        let s = LedgerSnapshot::new()
            .with_attempt(&attempt("θ", "think", 0.5), &policy)
            .unwrap()
            .with_attempt(&attempt("æ", "cat", 0.3), &policy)
            .unwrap()
            .with_attempt(&attempt("θ", "think", 0.2), &policy)
            .unwrap();

        let think = s.get(&PracticeKey::new("θ", "think").unwrap()).unwrap();
        let cat = s.get(&PracticeKey::new("æ", "cat").unwrap()).unwrap();
        assert_eq!(think.total_attempts, 2);
        assert_eq!(think.best_score, 0.5);
        assert_eq!(cat.total_attempts, 1);
    }

    #[test]
    fn from_entries_rejects_duplicates() {
        let err = LedgerSnapshot::from_entries(vec![
            entry("æ", "cat", 0.5, 1),
            entry("æ", "cat", 0.6, 2),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateEntry { .. }));
    }

    #[test]
    fn from_entries_rejects_invalid_entry() {
        let err = LedgerSnapshot::from_entries(vec![entry("æ", "cat", 0.5, 0)]).unwrap_err();
        assert!(matches!(err, ValidationError::ZeroAttempts { .. }));
    }

    #[test]
    fn serialises_as_entry_list() {
        let s = LedgerSnapshot::from_entries(vec![
            entry("θ", "think", 0.5, 1),
            entry("æ", "cat", 0.6, 2),
        ])
        .unwrap();

        let json = serde_json::to_value(&s).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        // Key order: "æ" < "θ".
        assert_eq!(list[0]["word"], "cat");

        let back: LedgerSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn deserialising_corrupt_list_fails() {
        let json = r#"[{"phoneme":"æ","word":"cat","bestScore":1.7,"totalAttempts":1,"mastered":false}]"#;
        assert!(serde_json::from_str::<LedgerSnapshot>(json).is_err());
    }
}
