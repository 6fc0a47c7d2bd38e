//! Practice service: turns analysis results into ledger updates.
//!
//! # Flow
//!
//! ```text
//! AnalysisResult
//!   └─▶ PronunciationFeedback::from_analysis   (classify aligned pair)
//!         └─▶ AttemptRecord::build              (normalised score, timestamp)
//!               └─▶ MasteryLedger::update       (per-key serialised)
//!                     └─▶ LedgerRepository::save (optional, serialised)
//! ```
//!
//! [`PracticeService`] is synchronous and `Send + Sync`; share it behind an
//! `Arc` and call [`record`](PracticeService::record) from any thread.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;

use crate::attempt::{AttemptRecord, PracticeKey};
use crate::config::{AnalysisConfig, AppConfig, RankingConfig};
use crate::error::ValidationError;
use crate::ledger::{LedgerSnapshot, MasteryLedger, MasteryPolicy, PhonemePracticeData};
use crate::phoneme::{AlignmentMismatchError, AnalysisResult, PronunciationFeedback};
use crate::ranking::Dashboard;
use crate::repository::{LedgerRepository, RepositoryError};

use super::analyzer::AnalyzerError;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors surfaced while recording a practice attempt.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The attempt (or stored state) failed validation; nothing was applied.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Strict alignment is on and the aligned sequences differ in length.
    #[error(transparent)]
    Alignment(#[from] AlignmentMismatchError),

    /// Loading or saving the ledger failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The speech-analysis service failed.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// Internal / unexpected error (e.g. tokio join failure).
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// AttemptOutcome
// ---------------------------------------------------------------------------

/// Everything produced by recording one attempt.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub attempt: AttemptRecord,
    pub feedback: PronunciationFeedback,
    /// Ledger entry after the update.
    pub entry: PhonemePracticeData,
    /// This attempt flipped the entry to mastered.
    pub newly_mastered: bool,
    /// A snapshot including this attempt reached the repository.
    pub persisted: bool,
}

// ---------------------------------------------------------------------------
// PracticeService
// ---------------------------------------------------------------------------

/// Owns the shared ledger and its repository.
pub struct PracticeService {
    ledger: MasteryLedger,
    repository: Arc<dyn LedgerRepository>,
    analysis: AnalysisConfig,
    ranking: RankingConfig,
    save_after_each_attempt: bool,
    /// Held while snapshotting and saving so a slower save can never
    /// overwrite a newer snapshot.
    save_lock: Mutex<()>,
}

impl PracticeService {
    /// Load the stored snapshot and build a service around it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Validation`]: the mastery settings are invalid.
    /// - [`SessionError::Repository`]: the snapshot could not be loaded.
    pub fn open(
        config: &AppConfig,
        repository: Arc<dyn LedgerRepository>,
    ) -> Result<Self, SessionError> {
        let policy = config.mastery.policy()?;
        let snapshot = repository.load()?;
        log::info!(
            "practice: opened ledger with {} entries (threshold={}, min_attempts={})",
            snapshot.len(),
            policy.threshold(),
            policy.min_attempts()
        );
        Ok(Self::with_parts(config, policy, snapshot, repository))
    }

    fn with_parts(
        config: &AppConfig,
        policy: MasteryPolicy,
        snapshot: LedgerSnapshot,
        repository: Arc<dyn LedgerRepository>,
    ) -> Self {
        Self {
            ledger: MasteryLedger::from_snapshot(snapshot, policy),
            repository,
            analysis: config.analysis.clone(),
            ranking: config.ranking.clone(),
            save_after_each_attempt: config.storage.save_after_each_attempt,
            save_lock: Mutex::new(()),
        }
    }

    pub fn ledger(&self) -> &MasteryLedger {
        &self.ledger
    }

    /// Record one analysed attempt.
    ///
    /// A failed save does not undo the in-memory update; it is logged and
    /// reported through [`AttemptOutcome::persisted`].
    pub fn record(
        &self,
        key: PracticeKey,
        analysis: &AnalysisResult,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AttemptOutcome, SessionError> {
        let feedback = PronunciationFeedback::from_analysis(analysis, self.analysis.strict_alignment)
            .map_err(|e| {
                log::warn!("practice: {key} rejected: {e}");
                e
            })?;

        let score = analysis.normalized_score(self.analysis.score_scale);
        let attempt = AttemptRecord::build(key, score, feedback.statuses(), timestamp)
            .map_err(|e| {
                log::warn!("practice: attempt rejected: {e}");
                e
            })?;

        let update = self.ledger.update(&attempt)?;

        let persisted = if self.save_after_each_attempt {
            match self.save() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("practice: could not persist ledger after {}: {e}", attempt.key());
                    false
                }
            }
        } else {
            false
        };

        Ok(AttemptOutcome {
            attempt,
            feedback,
            entry: update.entry,
            newly_mastered: update.newly_mastered,
            persisted,
        })
    }

    /// Persist the current ledger snapshot.
    pub fn save(&self) -> Result<(), SessionError> {
        let _guard = self.save_lock.lock();
        let snapshot = self.ledger.snapshot();
        self.repository.save(&snapshot)?;
        Ok(())
    }

    /// Dashboard view model for the current ledger.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(&self.ledger.snapshot(), &self.ranking)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
