//! Validation errors shared by the attempt builder, the ledger and snapshot
//! loading.
//!
//! Every error here is synchronous and local: the caller must not apply the
//! offending attempt or snapshot.

use thiserror::Error;

/// Data handed to the core failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Score lies outside `[0, 1]`.
    #[error("score {0} is outside [0, 1]")]
    ScoreOutOfRange(f64),

    /// Score is NaN or infinite.
    #[error("score is not a finite number")]
    NonFiniteScore,

    /// Practice key has an empty phoneme symbol.
    #[error("practice key has an empty phoneme")]
    EmptyPhoneme,

    /// Practice key has an empty word.
    #[error("practice key has an empty word")]
    EmptyWord,

    /// A stored entry claims zero attempts, which cannot exist in a ledger.
    #[error("entry ({phoneme}, {word}) has zero recorded attempts")]
    ZeroAttempts { phoneme: String, word: String },

    /// A stored entry is internally inconsistent.
    #[error("entry ({phoneme}, {word}) is corrupt: {reason}")]
    CorruptEntry {
        phoneme: String,
        word: String,
        reason: String,
    },

    /// Two stored entries share the same practice key.
    #[error("duplicate entry for ({phoneme}, {word})")]
    DuplicateEntry { phoneme: String, word: String },

    /// A configured mastery threshold lies outside `[0, 1]`.
    #[error("mastery threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}

/// Check that `score` is finite and inside `[0, 1]`.
///
/// `-0.0` comes back as `0.0` so stored scores compare equal bit for bit.
pub(crate) fn check_unit_score(score: f64) -> Result<f64, ValidationError> {
    if !score.is_finite() {
        return Err(ValidationError::NonFiniteScore);
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange(score));
    }
    Ok(score + 0.0)
}
