//! Seam to the remote speech-analysis service.
//!
//! The service itself (transport, authentication, retries) lives outside this
//! crate.  [`SpeechAnalyzer`] is the interface the practice orchestrator
//! calls; production code plugs in a network client, tests plug in doubles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::attempt::PracticeKey;
use crate::phoneme::AnalysisResult;

// ---------------------------------------------------------------------------
// AnalyzerError
// ---------------------------------------------------------------------------

/// Errors reported by a [`SpeechAnalyzer`] implementation.
#[derive(Debug, Clone, Error)]
pub enum AnalyzerError {
    /// The service could not be reached or refused the request.
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),

    /// The request did not complete in time.
    #[error("analysis request timed out")]
    Timeout,

    /// The service answered with something that is not an analysis result.
    #[error("invalid analysis response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// PracticeRequest
// ---------------------------------------------------------------------------

/// One recorded attempt waiting for analysis.
#[derive(Debug, Clone)]
pub struct PracticeRequest {
    /// Phoneme-in-word being practiced.
    pub key: PracticeKey,
    /// Encoded recording, passed through to the analyzer untouched.
    pub audio: Vec<u8>,
    /// When the attempt was made; `None` stamps it when it is recorded.
    pub timestamp: Option<DateTime<Utc>>,
}

impl PracticeRequest {
    pub fn new(key: PracticeKey, audio: Vec<u8>) -> Self {
        Self {
            key,
            audio,
            timestamp: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechAnalyzer trait
// ---------------------------------------------------------------------------

/// Async interface to the speech-analysis service.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn SpeechAnalyzer>`.
#[async_trait]
pub trait SpeechAnalyzer: Send + Sync {
    async fn analyze(&self, request: &PracticeRequest) -> Result<AnalysisResult, AnalyzerError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysTimeout;

    #[async_trait]
    impl SpeechAnalyzer for AlwaysTimeout {
        async fn analyze(&self, _req: &PracticeRequest) -> Result<AnalysisResult, AnalyzerError> {
            Err(AnalyzerError::Timeout)
        }
    }

    #[test]
    fn analyzer_is_object_safe() {
        let _: Box<dyn SpeechAnalyzer> = Box::new(AlwaysTimeout);
    }

    #[tokio::test]
    async fn error_passes_through_trait_object() {
        let analyzer: Box<dyn SpeechAnalyzer> = Box::new(AlwaysTimeout);
        let req = PracticeRequest::new(PracticeKey::new("æ", "cat").unwrap(), vec![]);
        let err = analyzer.analyze(&req).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Timeout));
        assert!(err.to_string().contains("timed out"));
    }
}
