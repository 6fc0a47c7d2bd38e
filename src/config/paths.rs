//! Where settings and the mastery ledger live on disk.
//!
//! Settings go under the platform config dir (`settings.toml`). The ledger
//! snapshot is learner data, not configuration, so it goes under the local
//! data dir (`ledger.json`) where it survives a settings reset.
//! `[storage] ledger_file` overrides the ledger location.

use std::path::{Path, PathBuf};

/// Resolved locations of the settings file and the default ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    /// Holds the ledger snapshot and nothing else.
    pub data_dir: PathBuf,
    pub ledger_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "phoneme-practice";
    const SETTINGS_FILE: &'static str = "settings.toml";
    const LEDGER_FILE: &'static str = "ledger.json";

    /// Platform directories via `dirs`, or `./phoneme-practice` when the
    /// platform reports none.
    pub fn new() -> Self {
        let here = PathBuf::from(".");
        Self::rooted_at(
            &dirs::config_dir().unwrap_or_else(|| here.clone()),
            &dirs::data_local_dir().unwrap_or(here),
        )
    }

    /// Lay the application out under explicit config and data roots.
    pub fn rooted_at(config_root: &Path, data_root: &Path) -> Self {
        let config_dir = config_root.join(Self::APP_NAME);
        let data_dir = data_root.join(Self::APP_NAME);
        Self {
            settings_file: config_dir.join(Self::SETTINGS_FILE),
            ledger_file: data_dir.join(Self::LEDGER_FILE),
            config_dir,
            data_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
