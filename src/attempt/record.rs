//! Immutable record of one practice attempt.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{check_unit_score, ValidationError};
use crate::phoneme::PositionStatus;

use super::PracticeKey;

/// One scored, timestamped attempt at a phoneme-in-word.
///
/// Fields are private so a record can only come out of [`build`](Self::build)
/// with a validated score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRecord {
    key: PracticeKey,
    score: f64,
    timestamp: DateTime<Utc>,
    statuses: Vec<PositionStatus>,
}

impl AttemptRecord {
    /// Package an attempt.
    ///
    /// `score` must be finite and inside `[0, 1]`; it is never clamped.
    /// `timestamp` defaults to now.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ScoreOutOfRange`]
    /// - [`ValidationError::NonFiniteScore`]
    ///
    /// ```
    /// use phoneme_practice::attempt::{AttemptRecord, PracticeKey};
    ///
    /// let key = PracticeKey::new("æ", "cat").unwrap();
    /// let record = AttemptRecord::build(key.clone(), 0.8, vec![], None).unwrap();
    /// assert_eq!(record.score(), 0.8);
    ///
    /// assert!(AttemptRecord::build(key, 1.2, vec![], None).is_err());
    /// ```
    pub fn build(
        key: PracticeKey,
        score: f64,
        statuses: Vec<PositionStatus>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let score = check_unit_score(score)?;
        Ok(Self {
            key,
            score,
            timestamp: timestamp.unwrap_or_else(Utc::now),
            statuses,
        })
    }

    pub fn key(&self) -> &PracticeKey {
        &self.key
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn statuses(&self) -> &[PositionStatus] {
        &self.statuses
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
