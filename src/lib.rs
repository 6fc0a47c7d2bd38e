//! Pronunciation-practice core.
//!
//! Classifies a learner's aligned phoneme sequence against the reference,
//! folds scored attempts into a per-phoneme mastery ledger, and derives the
//! "what to practice next" and progress views from it.
//!
//! ```text
//! AnalysisResult ─▶ phoneme::classify ─▶ AttemptRecord::build
//!                                              │
//!                                              ▼
//!                 ranking::Dashboard ◀─ MasteryLedger::update
//! ```
//!
//! Audio capture, the analysis service transport and rendering are outside
//! this crate; [`session::SpeechAnalyzer`] and
//! [`repository::LedgerRepository`] are the seams they plug into.

pub mod attempt;
pub mod config;
pub mod error;
pub mod ledger;
pub mod phoneme;
pub mod ranking;
pub mod repository;
pub mod session;

pub use error::ValidationError;
