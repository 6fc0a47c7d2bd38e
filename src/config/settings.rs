//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing keys fall back to their defaults, so a settings file only needs
//! the values it overrides.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::error::ValidationError;
use crate::ledger::MasteryPolicy;
use crate::ranking::DEFAULT_LIMIT;

// ---------------------------------------------------------------------------
// MasteryConfig
// ---------------------------------------------------------------------------

/// Mastery rule parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryConfig {
    /// Best score (0.0 – 1.0) an entry must reach to count as mastered.
    pub threshold: f64,
    /// Minimum recorded attempts before an entry can count as mastered.
    pub min_attempts: u32,
}

impl MasteryConfig {
    /// Validated [`MasteryPolicy`] for these settings.
    pub fn policy(&self) -> Result<MasteryPolicy, ValidationError> {
        MasteryPolicy::new(self.threshold, self.min_attempts)
    }
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            threshold: MasteryPolicy::DEFAULT_THRESHOLD,
            min_attempts: MasteryPolicy::DEFAULT_MIN_ATTEMPTS,
        }
    }
}

// ---------------------------------------------------------------------------
// RankingConfig
// ---------------------------------------------------------------------------

/// List lengths for the dashboard views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub needs_practice_limit: usize,
    pub recently_practiced_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            needs_practice_limit: DEFAULT_LIMIT,
            recently_practiced_limit: DEFAULT_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// How analysis-service results are turned into attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// The service's score is divided by this before validation.  `1.0` for
    /// a service that already reports `[0, 1]`, `100.0` for percentages.
    pub score_scale: f64,
    /// Refuse aligned sequences of unequal length instead of padding the
    /// shorter one with `missing`.
    pub strict_alignment: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            score_scale: 1.0,
            strict_alignment: false,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Ledger persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Ledger snapshot location.  `None` uses [`AppPaths::ledger_file`].
    pub ledger_file: Option<PathBuf>,
    /// Persist a fresh snapshot after every recorded attempt.
    pub save_after_each_attempt: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ledger_file: None,
            save_after_each_attempt: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use phoneme_practice::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Mastery rule.
    pub mastery: MasteryConfig,
    /// Dashboard list lengths.
    pub ranking: RankingConfig,
    /// Analysis-result handling.
    pub analysis: AnalysisConfig,
    /// Ledger persistence.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the core cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.mastery.policy()?;
        if !self.analysis.score_scale.is_finite() || self.analysis.score_scale <= 0.0 {
            anyhow::bail!(
                "analysis.score_scale must be a positive number, got {}",
                self.analysis.score_scale
            );
        }
        Ok(())
    }

    /// Where the ledger snapshot lives.
    pub fn ledger_path(&self) -> PathBuf {
        self.storage
            .ledger_file
            .clone()
            .unwrap_or_else(|| AppPaths::new().ledger_file)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.mastery.threshold, loaded.mastery.threshold);
        assert_eq!(original.mastery.min_attempts, loaded.mastery.min_attempts);
        assert_eq!(original.ranking, loaded.ranking);
        assert_eq!(original.analysis.score_scale, loaded.analysis.score_scale);
        assert_eq!(
            original.analysis.strict_alignment,
            loaded.analysis.strict_alignment
        );
        assert_eq!(original.storage.ledger_file, loaded.storage.ledger_file);
        assert_eq!(
            original.storage.save_after_each_attempt,
            loaded.storage.save_after_each_attempt
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.mastery.threshold, 0.9);
        assert_eq!(config.ranking, RankingConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.mastery.threshold, 0.9);
        assert_eq!(cfg.mastery.min_attempts, 1);
        assert_eq!(cfg.ranking.needs_practice_limit, 5);
        assert_eq!(cfg.ranking.recently_practiced_limit, 5);
        assert_eq!(cfg.analysis.score_scale, 1.0);
        assert!(!cfg.analysis.strict_alignment);
        assert!(cfg.storage.ledger_file.is_none());
        assert!(cfg.storage.save_after_each_attempt);
        assert!(cfg.validate().is_ok());
    }

    /// A partial file only overrides the keys it names.
    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[mastery]\nmin_attempts = 3\n").unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.mastery.min_attempts, 3);
        assert_eq!(cfg.mastery.threshold, 0.9);
        assert_eq!(cfg.analysis.score_scale, 1.0);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.mastery.threshold = 0.8;
        cfg.mastery.min_attempts = 2;
        cfg.ranking.needs_practice_limit = 10;
        cfg.analysis.score_scale = 100.0;
        cfg.analysis.strict_alignment = true;
        cfg.storage.ledger_file = Some(dir.path().join("ledger.json"));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.mastery.threshold, 0.8);
        assert_eq!(loaded.mastery.min_attempts, 2);
        assert_eq!(loaded.ranking.needs_practice_limit, 10);
        assert_eq!(loaded.analysis.score_scale, 100.0);
        assert!(loaded.analysis.strict_alignment);
        assert_eq!(loaded.ledger_path(), dir.path().join("ledger.json"));
    }

    #[test]
    fn invalid_threshold_is_rejected_on_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[mastery]\nthreshold = 1.5\n").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn non_positive_score_scale_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.analysis.score_scale = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn ledger_path_defaults_to_app_paths() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ledger_path(), AppPaths::new().ledger_file);
    }
}
