//! Process-local repository.

use parking_lot::Mutex;

use crate::ledger::LedgerSnapshot;

use super::{LedgerRepository, RepositoryError};

/// Keeps the last saved snapshot in memory and counts saves.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    snapshot: Mutex<LedgerSnapshot>,
    saves: Mutex<usize>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `snapshot` already stored.
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful [`save`](LedgerRepository::save) calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl LedgerRepository for InMemoryRepository {
    fn load(&self) -> Result<LedgerSnapshot, RepositoryError> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError> {
        *self.snapshot.lock() = snapshot.clone();
        *self.saves.lock() += 1;
        Ok(())
    }
}
