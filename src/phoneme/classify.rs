//! Position-by-position classification of aligned phoneme sequences.
//!
//! Alignment itself happens upstream in the analysis service; by the time a
//! pair of sequences reaches [`classify`], `reference[i]` is already paired
//! with `predicted[i]`, with [`GAP`](super::GAP) standing in for positions
//! where one side has no phoneme.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::token::is_gap;

// ---------------------------------------------------------------------------
// PositionStatus
// ---------------------------------------------------------------------------

/// Outcome for one aligned index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    /// The learner produced the reference phoneme.
    Correct,
    /// The learner produced a different phoneme (or a gap against a phoneme).
    Incorrect,
    /// Nothing to compare at this index.
    Missing,
}

impl PositionStatus {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            PositionStatus::Correct => "correct",
            PositionStatus::Incorrect => "incorrect",
            PositionStatus::Missing => "missing",
        }
    }
}

// ---------------------------------------------------------------------------
// AlignmentMismatchError
// ---------------------------------------------------------------------------

/// Raised by [`classify_strict`] when the aligned sequences differ in length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("aligned sequences differ in length: reference {reference_len}, predicted {predicted_len}")]
pub struct AlignmentMismatchError {
    pub reference_len: usize,
    pub predicted_len: usize,
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Classify every aligned index of `reference` against `predicted`.
///
/// The result has `max(reference.len(), predicted.len())` entries.  For each
/// index, in priority order:
///
/// 1. past the end of either sequence → [`Missing`](PositionStatus::Missing)
/// 2. both sides are the gap placeholder → `Missing`
/// 3. same symbol → [`Correct`](PositionStatus::Correct)
/// 4. anything else → [`Incorrect`](PositionStatus::Incorrect)
///
/// ```
/// use phoneme_practice::phoneme::{classify, PositionStatus};
///
/// let empty: [&str; 0] = [];
/// assert_eq!(classify(&["k", "æ", "t"], &empty), vec![PositionStatus::Missing; 3]);
/// ```
pub fn classify<R, P>(reference: &[R], predicted: &[P]) -> Vec<PositionStatus>
where
    R: AsRef<str>,
    P: AsRef<str>,
{
    let len = reference.len().max(predicted.len());

    (0..len)
        .map(|i| match (reference.get(i), predicted.get(i)) {
            (Some(r), Some(p)) => classify_position(r.as_ref(), p.as_ref()),
            _ => PositionStatus::Missing,
        })
        .collect()
}

/// Like [`classify`], but refuses sequences of unequal length instead of
/// padding the shorter one with `Missing`.
pub fn classify_strict<R, P>(
    reference: &[R],
    predicted: &[P],
) -> Result<Vec<PositionStatus>, AlignmentMismatchError>
where
    R: AsRef<str>,
    P: AsRef<str>,
{
    if reference.len() != predicted.len() {
        return Err(AlignmentMismatchError {
            reference_len: reference.len(),
            predicted_len: predicted.len(),
        });
    }
    Ok(classify(reference, predicted))
}

fn classify_position(reference: &str, predicted: &str) -> PositionStatus {
    if is_gap(reference) && is_gap(predicted) {
        PositionStatus::Missing
    } else if reference == predicted {
        PositionStatus::Correct
    } else {
        PositionStatus::Incorrect
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
