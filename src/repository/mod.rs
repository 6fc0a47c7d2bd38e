//! Persistence boundary for ledger snapshots.
//!
//! The core never talks to storage directly; callers inject a
//! [`LedgerRepository`]:
//!
//! * [`JsonFileRepository`]: pretty-printed JSON file on local disk.
//! * [`InMemoryRepository`]: process-local, for tests and demos.

pub mod json_file;
pub mod memory;

use thiserror::Error;

use crate::error::ValidationError;
use crate::ledger::LedgerSnapshot;

pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;

// ---------------------------------------------------------------------------
// RepositoryError
// ---------------------------------------------------------------------------

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying storage could not be read or written.
    #[error("ledger storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data is not valid JSON of the expected shape.
    #[error("ledger snapshot could not be (de)serialised: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored entries parsed but violate ledger invariants.
    #[error("stored ledger is invalid: {0}")]
    Validation(#[from] ValidationError),
}

// ---------------------------------------------------------------------------
// LedgerRepository trait
// ---------------------------------------------------------------------------

/// Loads and saves whole ledger snapshots.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn LedgerRepository>` by the practice orchestrator.
pub trait LedgerRepository: Send + Sync {
    /// Load the stored snapshot; an empty snapshot when nothing is stored.
    fn load(&self) -> Result<LedgerSnapshot, RepositoryError>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError>;
}

// Compile-time assertion: Box<dyn LedgerRepository> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn LedgerRepository>) {}
};
