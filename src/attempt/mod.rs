//! Practice identities and immutable attempt records.
//!
//! * [`PracticeKey`]: validated `(phoneme, word)` identity.  The same
//!   phoneme in two different words is tracked as two keys.
//! * [`AttemptRecord`]: one scored, timestamped attempt with its
//!   per-position classification.  Built once, never mutated.

pub mod key;
pub mod record;

pub use key::PracticeKey;
pub use record::AttemptRecord;
