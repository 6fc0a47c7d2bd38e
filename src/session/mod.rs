//! Practice session glue: analysis service seam, synchronous service and
//! async orchestrator.
//!
//! # Architecture
//!
//! ```text
//! PracticeRequest (mpsc)
//!        │
//!        ▼
//! PracticeOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ SpeechAnalyzer::analyze          (remote service, async)
//!        └─ PracticeService::record          (spawn_blocking)
//!              ├─ classify → AttemptRecord
//!              ├─ MasteryLedger::update
//!              └─ LedgerRepository::save
//!        │
//!        ▼
//! SessionEvent (mpsc) ──▶ rendering layer
//! ```

pub mod analyzer;
pub mod runner;
pub mod service;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use analyzer::{AnalyzerError, PracticeRequest, SpeechAnalyzer};
pub use runner::{PracticeOrchestrator, SessionEvent};
pub use service::{AttemptOutcome, PracticeService, SessionError};
