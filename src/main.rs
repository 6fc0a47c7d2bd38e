//! Application entry point: fold analysed attempts into the ledger and
//! print the progress dashboard.
//!
//! # Usage
//!
//! ```text
//! phoneme-practice [SUBMISSIONS.json ...]
//! ```
//!
//! Each file holds a JSON list of submissions:
//!
//! ```json
//! [{ "phoneme": "æ", "word": "cat", "timestamp": "2024-05-01T09:00:00Z",
//!    "analysis": { "reference_phonemes": ["k","æ","t"], ... } }]
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Open the JSON ledger repository and the [`PracticeService`].
//! 4. Record every submission; rejected ones are logged and skipped.
//! 5. Save the ledger and print the dashboard as JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use phoneme_practice::{
    attempt::PracticeKey,
    config::AppConfig,
    phoneme::AnalysisResult,
    repository::JsonFileRepository,
    session::PracticeService,
};

/// One analysed attempt as stored in a submissions file.
#[derive(Debug, Deserialize)]
struct Submission {
    phoneme: String,
    word: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    analysis: AnalysisResult,
}

fn read_submissions(path: &Path) -> Result<Vec<Submission>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

/// Per-file tally of submissions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    recorded: usize,
    rejected: usize,
    /// Recorded but not yet written to the ledger file.
    unpersisted: usize,
}

impl std::ops::AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.recorded += other.recorded;
        self.rejected += other.rejected;
        self.unpersisted += other.unpersisted;
    }
}

fn record_file(service: &PracticeService, path: &Path) -> Result<Tally> {
    let mut tally = Tally::default();

    for submission in read_submissions(path)? {
        let result = PracticeKey::new(submission.phoneme, submission.word)
            .map_err(Into::into)
            .and_then(|key| service.record(key, &submission.analysis, submission.timestamp));

        match result {
            Ok(outcome) => {
                tally.recorded += 1;
                if !outcome.persisted {
                    tally.unpersisted += 1;
                }
                if outcome.newly_mastered {
                    log::info!("mastered {}", outcome.attempt.key());
                }
            }
            Err(e) => {
                tally.rejected += 1;
                log::warn!("{}: submission skipped: {e}", path.display());
            }
        }
    }

    Ok(tally)
}

/// Write out anything still only in memory; a failure here is fatal.
fn flush_ledger(service: &PracticeService, tally: &Tally) -> Result<()> {
    if tally.unpersisted > 0 {
        service.save().context("saving ledger")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Repository + service
    let ledger_path = config.ledger_path();
    let repository = Arc::new(JsonFileRepository::new(&ledger_path));
    let service = PracticeService::open(&config, repository)
        .with_context(|| format!("opening ledger at {}", ledger_path.display()))?;

    // 4. Submissions
    let mut tally = Tally::default();
    for arg in std::env::args_os().skip(1) {
        tally += record_file(&service, Path::new(&arg))?;
    }
    log::info!(
        "recorded {} attempts, skipped {}",
        tally.recorded,
        tally.rejected
    );

    // 5. Save + dashboard
    flush_ledger(&service, &tally)?;

    let dashboard = service.dashboard();
    if dashboard.is_empty() {
        log::info!("no practice recorded yet");
    }
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
