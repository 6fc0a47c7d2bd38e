//! Practice orchestrator: drives analysis → ledger for incoming attempts.
//!
//! [`PracticeOrchestrator`] receives [`PracticeRequest`]s over a
//! `tokio::sync::mpsc` channel and reports [`SessionEvent`]s back.
//!
//! # Flow
//!
//! ```text
//! PracticeRequest
//!   └─▶ tokio::spawn (one task per request)
//!         └─▶ analyzer.analyze (async)
//!               ├─ Err → SessionEvent::Failed
//!               └─ Ok  → spawn_blocking(service.record)
//!                          ├─ Ok  → AttemptRecorded [+ Mastered]
//!                          └─ Err → SessionEvent::Failed
//! ```
//!
//! Requests are processed concurrently, so a learner can submit a new
//! recording while the previous one is still being analysed.  Attempts for
//! the same key are folded one at a time by the ledger.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::attempt::PracticeKey;
use crate::ledger::PhonemePracticeData;

use super::analyzer::{PracticeRequest, SpeechAnalyzer};
use super::service::{AttemptOutcome, PracticeService, SessionError};

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Progress reported by the orchestrator.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// An attempt was analysed and folded into the ledger.
    AttemptRecorded {
        key: PracticeKey,
        outcome: Box<AttemptOutcome>,
    },
    /// The attempt just recorded made its key mastered.
    Mastered {
        key: PracticeKey,
        entry: PhonemePracticeData,
    },
    /// The attempt was not applied.
    Failed { key: PracticeKey, message: String },
}

// ---------------------------------------------------------------------------
// PracticeOrchestrator
// ---------------------------------------------------------------------------

/// Connects a [`SpeechAnalyzer`] to a shared [`PracticeService`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use phoneme_practice::config::AppConfig;
/// use phoneme_practice::repository::InMemoryRepository;
/// use phoneme_practice::session::{PracticeOrchestrator, PracticeService, SpeechAnalyzer};
///
/// # async fn example() {
/// # fn make_analyzer() -> Arc<dyn SpeechAnalyzer> { unimplemented!() }
/// let service = PracticeService::open(
///     &AppConfig::default(),
///     Arc::new(InMemoryRepository::new()),
/// )
/// .unwrap();
///
/// let (request_tx, request_rx) = tokio::sync::mpsc::channel(16);
/// let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(32);
/// let orchestrator = PracticeOrchestrator::new(Arc::new(service), make_analyzer());
/// tokio::spawn(orchestrator.run(request_rx, event_tx));
/// # drop(request_tx);
/// # while event_rx.recv().await.is_some() {}
/// # }
/// ```
pub struct PracticeOrchestrator {
    service: Arc<PracticeService>,
    analyzer: Arc<dyn SpeechAnalyzer>,
}

impl PracticeOrchestrator {
    pub fn new(service: Arc<PracticeService>, analyzer: Arc<dyn SpeechAnalyzer>) -> Self {
        Self { service, analyzer }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `requests` is closed and every in-flight attempt finished.
    pub async fn run(
        self,
        mut requests: mpsc::Receiver<PracticeRequest>,
        events: mpsc::Sender<SessionEvent>,
    ) {
        let mut in_flight = JoinSet::new();

        while let Some(request) = requests.recv().await {
            log::debug!("practice: request for {}", request.key);
            let service = Arc::clone(&self.service);
            let analyzer = Arc::clone(&self.analyzer);
            let events = events.clone();
            in_flight.spawn(async move {
                handle_request(service, analyzer, request, events).await;
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                log::error!("practice: attempt task failed: {e}");
            }
        }

        log::info!("practice: request channel closed, orchestrator shutting down");
    }
}

// ---------------------------------------------------------------------------
// Per-request handling
// ---------------------------------------------------------------------------

async fn handle_request(
    service: Arc<PracticeService>,
    analyzer: Arc<dyn SpeechAnalyzer>,
    request: PracticeRequest,
    events: mpsc::Sender<SessionEvent>,
) {
    let key = request.key.clone();

    match process(service, analyzer, request).await {
        Ok(outcome) => {
            let mastered = outcome
                .newly_mastered
                .then(|| outcome.entry.clone());

            emit(
                &events,
                SessionEvent::AttemptRecorded {
                    key: key.clone(),
                    outcome: Box::new(outcome),
                },
            )
            .await;

            if let Some(entry) = mastered {
                emit(&events, SessionEvent::Mastered { key, entry }).await;
            }
        }
        Err(e) => {
            log::warn!("practice: attempt for {key} failed: {e}");
            emit(
                &events,
                SessionEvent::Failed {
                    key,
                    message: e.to_string(),
                },
            )
            .await;
        }
    }
}

/// The ledger is already updated by the time an event is sent, so a closed
/// receiver only loses the notification.
async fn emit(events: &mpsc::Sender<SessionEvent>, event: SessionEvent) {
    if let Err(mpsc::error::SendError(event)) = events.send(event).await {
        log::debug!("practice: event receiver gone, dropping {event:?}");
    }
}

async fn process(
    service: Arc<PracticeService>,
    analyzer: Arc<dyn SpeechAnalyzer>,
    request: PracticeRequest,
) -> Result<AttemptOutcome, SessionError> {
    let analysis = analyzer.analyze(&request).await?;

    // Recording may write the snapshot to disk.
    let PracticeRequest { key, timestamp, .. } = request;
    tokio::task::spawn_blocking(move || service.record(key, &analysis, timestamp))
        .await
        .map_err(|e| SessionError::Internal(e.to_string()))?
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::phoneme::AnalysisResult;
    use crate::repository::{InMemoryRepository, LedgerRepository};
    use crate::session::AnalyzerError;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Scores every request with a fixed score; the reference is the word's
    /// letters and the prediction echoes it.
    struct FixedScore(f64);

    #[async_trait]
    impl SpeechAnalyzer for FixedScore {
        async fn analyze(&self, req: &PracticeRequest) -> Result<AnalysisResult, AnalyzerError> {
            let phonemes: Vec<String> = req.key.word().chars().map(String::from).collect();
            Ok(AnalysisResult {
                reference_phonemes: phonemes.clone(),
                predicted_phonemes: phonemes,
                aligned_reference: None,
                aligned_predicted: None,
                score: self.0,
                confidence: 1.0,
                mispronunciations: vec![],
            })
        }
    }

    /// Reads the score from the first byte of the "audio" (percent).
    struct ScoreFromAudio;

    #[async_trait]
    impl SpeechAnalyzer for ScoreFromAudio {
        async fn analyze(&self, req: &PracticeRequest) -> Result<AnalysisResult, AnalyzerError> {
            let pct = *req
                .audio
                .first()
                .ok_or_else(|| AnalyzerError::InvalidResponse("no audio".into()))?;
            Ok(AnalysisResult {
                reference_phonemes: vec!["k".into()],
                predicted_phonemes: vec!["k".into()],
                aligned_reference: None,
                aligned_predicted: None,
                score: f64::from(pct) / 100.0,
                confidence: 1.0,
                mispronunciations: vec![],
            })
        }
    }

    struct Unreachable;

    #[async_trait]
    impl SpeechAnalyzer for Unreachable {
        async fn analyze(&self, _req: &PracticeRequest) -> Result<AnalysisResult, AnalyzerError> {
            Err(AnalyzerError::Unavailable("connection refused".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn key(word: &str) -> PracticeKey {
        PracticeKey::new("æ", word).unwrap()
    }

    fn make_service() -> (Arc<PracticeService>, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = PracticeService::open(&AppConfig::default(), repo.clone()).unwrap();
        (Arc::new(svc), repo)
    }

    async fn run_all(
        service: Arc<PracticeService>,
        analyzer: Arc<dyn SpeechAnalyzer>,
        requests: Vec<PracticeRequest>,
    ) -> Vec<SessionEvent> {
        let (req_tx, req_rx) = mpsc::channel(requests.len().max(1));
        let (ev_tx, mut ev_rx) = mpsc::channel(requests.len() * 2 + 1);

        for r in requests {
            req_tx.send(r).await.unwrap();
        }
        drop(req_tx);

        PracticeOrchestrator::new(service, analyzer)
            .run(req_rx, ev_tx)
            .await;

        let mut events = Vec::new();
        while let Some(ev) = ev_rx.recv().await {
            events.push(ev);
        }
        events
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn records_attempt_and_emits_event() {
        let (svc, repo) = make_service();
        let events = run_all(
            Arc::clone(&svc),
            Arc::new(FixedScore(0.5)),
            vec![PracticeRequest::new(key("cat"), vec![])],
        )
        .await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            SessionEvent::AttemptRecorded { key: k, outcome } => {
                assert_eq!(k, &key("cat"));
                assert_eq!(outcome.entry.total_attempts, 1);
                assert_eq!(outcome.feedback.correct, 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mastery_emits_extra_event() {
        let (svc, _) = make_service();
        let events = run_all(
            svc,
            Arc::new(FixedScore(0.95)),
            vec![PracticeRequest::new(key("cat"), vec![])],
        )
        .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SessionEvent::Mastered { .. }));
    }

    #[tokio::test]
    async fn analyzer_failure_is_reported_not_applied() {
        let (svc, repo) = make_service();
        let events = run_all(
            Arc::clone(&svc),
            Arc::new(Unreachable),
            vec![PracticeRequest::new(key("cat"), vec![])],
        )
        .await;

        match &events[0] {
            SessionEvent::Failed { message, .. } => assert!(message.contains("unavailable")),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(svc.ledger().is_empty());
        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn invalid_score_is_reported() {
        let (svc, _) = make_service();
        let events = run_all(
            Arc::clone(&svc),
            Arc::new(FixedScore(42.0)),
            vec![PracticeRequest::new(key("cat"), vec![])],
        )
        .await;

        assert!(matches!(events[0], SessionEvent::Failed { .. }));
        assert!(svc.ledger().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_for_one_key_are_all_counted() {
        let (svc, repo) = make_service();
        let requests: Vec<PracticeRequest> = (0..50u8)
            .map(|i| PracticeRequest::new(key("cat"), vec![i]))
            .collect();

        let events = run_all(Arc::clone(&svc), Arc::new(ScoreFromAudio), requests).await;

        assert_eq!(events.len(), 50);
        let entry = svc.ledger().get(&key("cat")).unwrap();
        assert_eq!(entry.total_attempts, 50);
        assert!((entry.best_score - 0.49).abs() < 1e-9);
        assert!(!entry.mastered);

        // The last save always carries the latest state.
        let stored = repo.load().unwrap();
        assert_eq!(stored.get(&key("cat")).unwrap().total_attempts, 50);
    }

    #[tokio::test]
    async fn closed_event_receiver_still_applies_attempts() {
        let (svc, repo) = make_service();
        let (req_tx, req_rx) = mpsc::channel(2);
        let (ev_tx, ev_rx) = mpsc::channel(1);
        drop(ev_rx);

        req_tx
            .send(PracticeRequest::new(key("cat"), vec![]))
            .await
            .unwrap();
        req_tx
            .send(PracticeRequest::new(key("hat"), vec![]))
            .await
            .unwrap();
        drop(req_tx);

        PracticeOrchestrator::new(Arc::clone(&svc), Arc::new(FixedScore(0.95)))
            .run(req_rx, ev_tx)
            .await;

        assert_eq!(svc.ledger().len(), 2);
        assert!(svc.ledger().get(&key("cat")).unwrap().mastered);
        assert_eq!(repo.load().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_channel_shuts_down_cleanly() {
        let (svc, _) = make_service();
        let events = run_all(svc, Arc::new(FixedScore(0.5)), vec![]).await;
        assert!(events.is_empty());
    }
}
