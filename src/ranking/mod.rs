//! Read-only views over a ledger snapshot.
//!
//! * [`needs_practice`]: unmastered entries, weakest first.
//! * [`recently_practiced`]: most recently attempted entries.
//! * [`aggregate_stats`]: dashboard totals.
//! * [`Dashboard`]: the three bundled as one view model.
//!
//! None of these depend on the snapshot's iteration order; every sort has a
//! full tie-break down to the practice key.

pub mod dashboard;
pub mod priority;
pub mod stats;

pub use dashboard::Dashboard;
pub use priority::{needs_practice, recently_practiced, DEFAULT_LIMIT};
pub use stats::{aggregate_stats, PracticeStats};
