//! Phoneme alignment classification and analysis-service result shapes.
//!
//! This module provides:
//! * [`classify`] / [`classify_strict`]: per-position status of two aligned
//!   phoneme sequences.
//! * [`AnalysisResult`]: the record returned by the remote speech-analysis
//!   service, with [`AnalysisResult::aligned_pair`] picking the sequences the
//!   classifier should see.
//! * [`PronunciationFeedback`]: a read-only view model for visualising one
//!   attempt.
//!
//! # Quick start
//!
//! ```rust
//! use phoneme_practice::phoneme::{classify, PositionStatus};
//!
//! let statuses = classify(&["k", "æ", "t"], &["k", "ɪ", "t"]);
//! assert_eq!(
//!     statuses,
//!     vec![
//!         PositionStatus::Correct,
//!         PositionStatus::Incorrect,
//!         PositionStatus::Correct,
//!     ]
//! );
//! ```

pub mod analysis;
pub mod classify;
pub mod token;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use analysis::{
    AnalysisResult, FeedbackCell, Mispronunciation, MispronunciationKind, PronunciationFeedback,
};
pub use classify::{classify, classify_strict, AlignmentMismatchError, PositionStatus};
pub use token::{is_gap, PhonemeToken, GAP};
