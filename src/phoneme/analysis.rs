//! Result shape of the remote speech-analysis service and the per-attempt
//! feedback view model derived from it.
//!
//! Transport is not handled here.  Whatever client talks to the service
//! deserialises its JSON into [`AnalysisResult`]; everything downstream
//! works on that value.

use serde::{Deserialize, Serialize};

use super::classify::{classify, classify_strict, AlignmentMismatchError, PositionStatus};
use super::token::PhonemeToken;

// ---------------------------------------------------------------------------
// Mispronunciation events
// ---------------------------------------------------------------------------

/// Kind of a discrete mispronunciation event reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MispronunciationKind {
    Substitution,
    Deletion,
    Insertion,
}

/// One mispronunciation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mispronunciation {
    #[serde(rename = "type")]
    pub kind: MispronunciationKind,
    /// Reference symbol the learner should have produced.
    pub expected: PhonemeToken,
    /// Symbol the learner actually produced; absent for deletions.
    #[serde(default)]
    pub actual: Option<PhonemeToken>,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Analysis of one recorded attempt, as returned by the speech-analysis
/// service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub reference_phonemes: Vec<PhonemeToken>,
    pub predicted_phonemes: Vec<PhonemeToken>,
    /// Pre-aligned reference sequence, with gap placeholders.
    #[serde(default)]
    pub aligned_reference: Option<Vec<PhonemeToken>>,
    /// Pre-aligned predicted sequence, with gap placeholders.
    #[serde(default)]
    pub aligned_predicted: Option<Vec<PhonemeToken>>,
    /// Overall score on the service's own scale.
    pub score: f64,
    /// Service confidence in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub mispronunciations: Vec<Mispronunciation>,
}

impl AnalysisResult {
    /// The sequences the classifier should compare.
    ///
    /// The pre-aligned pair wins whenever the service supplied both halves of
    /// it; otherwise the raw sequences are used as-is.
    pub fn aligned_pair(&self) -> (&[PhonemeToken], &[PhonemeToken]) {
        match (&self.aligned_reference, &self.aligned_predicted) {
            (Some(r), Some(p)) => (r, p),
            _ => (&self.reference_phonemes, &self.predicted_phonemes),
        }
    }

    /// `true` when the pre-aligned pair is present.
    pub fn is_pre_aligned(&self) -> bool {
        self.aligned_reference.is_some() && self.aligned_predicted.is_some()
    }

    /// Score rescaled to `[0, 1]` by dividing by `scale` (e.g. `100.0` for a
    /// service that reports percentages).
    ///
    /// No clamping happens here: an out-of-range result is left for the
    /// attempt builder to reject.
    pub fn normalized_score(&self, scale: f64) -> f64 {
        self.score / scale
    }

    /// Classify the aligned pair.
    pub fn statuses(&self) -> Vec<PositionStatus> {
        let (r, p) = self.aligned_pair();
        classify(r, p)
    }

    /// Number of mispronunciation events of the given kind.
    pub fn count_events(&self, kind: MispronunciationKind) -> usize {
        self.mispronunciations
            .iter()
            .filter(|m| m.kind == kind)
            .count()
    }
}

// ---------------------------------------------------------------------------
// PronunciationFeedback
// ---------------------------------------------------------------------------

/// One aligned position ready for visualisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackCell {
    /// Reference symbol, `None` past the end of the reference sequence.
    pub reference: Option<PhonemeToken>,
    /// Predicted symbol, `None` past the end of the predicted sequence.
    pub predicted: Option<PhonemeToken>,
    pub status: PositionStatus,
}

/// Read-only view model of a single analysed attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PronunciationFeedback {
    pub cells: Vec<FeedbackCell>,
    pub correct: usize,
    pub incorrect: usize,
    pub missing: usize,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub confidence: f64,
}

impl PronunciationFeedback {
    /// Build feedback from an analysis result.
    ///
    /// With `strict` set, unequal aligned lengths are refused instead of
    /// being padded with `Missing`.
    pub fn from_analysis(
        analysis: &AnalysisResult,
        strict: bool,
    ) -> Result<Self, AlignmentMismatchError> {
        let (reference, predicted) = analysis.aligned_pair();
        let statuses = if strict {
            classify_strict(reference, predicted)?
        } else {
            classify(reference, predicted)
        };

        let cells: Vec<FeedbackCell> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| FeedbackCell {
                reference: reference.get(i).cloned(),
                predicted: predicted.get(i).cloned(),
                status: *status,
            })
            .collect();

        let count = |s: PositionStatus| statuses.iter().filter(|x| **x == s).count();

        Ok(Self {
            correct: count(PositionStatus::Correct),
            incorrect: count(PositionStatus::Incorrect),
            missing: count(PositionStatus::Missing),
            substitutions: analysis.count_events(MispronunciationKind::Substitution),
            deletions: analysis.count_events(MispronunciationKind::Deletion),
            insertions: analysis.count_events(MispronunciationKind::Insertion),
            confidence: analysis.confidence,
            cells,
        })
    }

    /// Status sequence, one entry per aligned position.
    pub fn statuses(&self) -> Vec<PositionStatus> {
        self.cells.iter().map(|c| c.status).collect()
    }

    /// Share of positions classified `Correct`; `0.0` for an empty alignment.
    pub fn accuracy(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.correct as f64 / self.cells.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
