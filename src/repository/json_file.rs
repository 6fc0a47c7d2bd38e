//! Ledger snapshots persisted as a JSON file.

use std::path::{Path, PathBuf};

use crate::ledger::{LedgerSnapshot, PhonemePracticeData};

use super::{LedgerRepository, RepositoryError};

/// Stores the snapshot as a pretty-printed JSON list of entries.
///
/// Writes go to a sibling `*.tmp` file first and are renamed into place, so
/// a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerRepository for JsonFileRepository {
    fn load(&self) -> Result<LedgerSnapshot, RepositoryError> {
        if !self.path.exists() {
            log::info!(
                "repository: no ledger at {}, starting empty",
                self.path.display()
            );
            return Ok(LedgerSnapshot::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        // Parse and validate separately so broken entries surface as
        // `Validation` rather than a JSON error.
        let entries: Vec<PhonemePracticeData> = serde_json::from_str(&data)?;
        let snapshot = LedgerSnapshot::from_entries(entries)?;
        log::info!(
            "repository: loaded {} entries from {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!(
            "repository: saved {} entries to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
