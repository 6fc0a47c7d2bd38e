//! Cross-session mastery ledger.
//!
//! This module provides:
//! * [`MasteryPolicy`]: configurable mastery rule.
//! * [`PhonemePracticeData`] and [`fold_attempt`]: per-key aggregates and
//!   the pure fold that advances them.
//! * [`LedgerSnapshot`]: read-only, serialisable copy of all entries.
//! * [`MasteryLedger`]: shared store with per-key serialised updates.
//!
//! # Quick start
//!
//! ```rust
//! use phoneme_practice::attempt::{AttemptRecord, PracticeKey};
//! use phoneme_practice::ledger::{MasteryLedger, MasteryPolicy};
//!
//! let ledger = MasteryLedger::new(MasteryPolicy::default());
//! let key = PracticeKey::new("æ", "cat").unwrap();
//!
//! for score in [0.4, 0.7, 0.6] {
//!     let attempt = AttemptRecord::build(key.clone(), score, vec![], None).unwrap();
//!     ledger.update(&attempt).unwrap();
//! }
//!
//! let entry = ledger.get(&key).unwrap();
//! assert_eq!(entry.best_score, 0.7);
//! assert_eq!(entry.total_attempts, 3);
//! assert!(!entry.mastered);
//! ```

pub mod entry;
pub mod policy;
pub mod snapshot;
pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use entry::{fold_attempt, PhonemePracticeData};
pub use policy::MasteryPolicy;
pub use snapshot::LedgerSnapshot;
pub use store::{LedgerUpdate, MasteryLedger};
