//! Per-key aggregate statistics and the pure fold that advances them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attempt::{AttemptRecord, PracticeKey};
use crate::error::{check_unit_score, ValidationError};

use super::policy::MasteryPolicy;

/// Cumulative practice statistics for one phoneme-in-word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonemePracticeData {
    pub phoneme: String,
    pub word: String,
    pub best_score: f64,
    pub total_attempts: u32,
    pub mastered: bool,
    #[serde(default)]
    pub last_attempted: Option<DateTime<Utc>>,
}

impl PhonemePracticeData {
    /// Practice key this entry belongs to.
    pub fn key(&self) -> Result<PracticeKey, ValidationError> {
        PracticeKey::new(self.phoneme.clone(), self.word.clone())
    }

    /// Check the entry could have been produced by folding attempts.
    ///
    /// Used on entries coming back from a persistent store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.key()?;
        if self.total_attempts == 0 {
            return Err(ValidationError::ZeroAttempts {
                phoneme: self.phoneme.clone(),
                word: self.word.clone(),
            });
        }
        if check_unit_score(self.best_score).is_err() {
            return Err(self.corrupt(format!("best score {} is outside [0, 1]", self.best_score)));
        }
        Ok(())
    }

    fn corrupt(&self, reason: String) -> ValidationError {
        ValidationError::CorruptEntry {
            phoneme: self.phoneme.clone(),
            word: self.word.clone(),
            reason,
        }
    }
}

/// Fold one attempt into the entry for its key.
///
/// `existing` is the current entry, or `None` when the key has never been
/// practiced.  The returned entry satisfies:
///
/// * `best_score` never decreases;
/// * `total_attempts` grows by exactly one;
/// * `last_attempted` is the attempt's timestamp, whatever its score;
/// * `mastered` never goes back to `false`.
///
/// # Errors
///
/// Fails when `existing` is itself invalid (see
/// [`PhonemePracticeData::validate`]) or belongs to a different key.  The
/// attempt must not be applied in that case.
pub fn fold_attempt(
    existing: Option<&PhonemePracticeData>,
    attempt: &AttemptRecord,
    policy: &MasteryPolicy,
) -> Result<PhonemePracticeData, ValidationError> {
    let key = attempt.key();

    let Some(prev) = existing else {
        return Ok(PhonemePracticeData {
            phoneme: key.phoneme().to_string(),
            word: key.word().to_string(),
            best_score: attempt.score(),
            total_attempts: 1,
            mastered: policy.is_mastered(attempt.score(), 1),
            last_attempted: Some(attempt.timestamp()),
        });
    };

    prev.validate()?;
    if prev.phoneme != key.phoneme() || prev.word != key.word() {
        return Err(prev.corrupt(format!("entry does not belong to {key}")));
    }

    let total_attempts = prev.total_attempts.checked_add(1).ok_or_else(|| {
        prev.corrupt("attempt counter overflow".into())
    })?;
    let best_score = prev.best_score.max(attempt.score());

    Ok(PhonemePracticeData {
        phoneme: prev.phoneme.clone(),
        word: prev.word.clone(),
        best_score,
        total_attempts,
        mastered: prev.mastered || policy.is_mastered(best_score, total_attempts),
        last_attempted: Some(attempt.timestamp()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
