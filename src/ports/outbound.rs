//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ConcernLabel, ConcernScore, DomainError, Session, SessionOverview};
use std::path::Path;

/// Generation constraints passed to the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    /// Upper bound on output length, in summarizer-defined tokens.
    pub max_length: u32,
    /// Lower bound on output length, in summarizer-defined tokens.
    pub min_length: u32,
    /// Greedy decoding, no sampling.
    pub deterministic: bool,
}

/// The only parameters session summaries are generated with.
pub const SESSION_SUMMARY_PARAMS: SummaryParams = SummaryParams {
    max_length: 150,
    min_length: 30,
    deterministic: true,
};

/// Abstractive summarization backend. Opaque text in, text out.
#[async_trait::async_trait]
pub trait SummarizerPort: Send + Sync {
    async fn summarize(&self, text: &str, params: SummaryParams) -> Result<String, DomainError>;
}

/// Multi-label classifier. Scores are independent per label and need not sum to 1.
#[async_trait::async_trait]
pub trait ClassifierPort: Send + Sync {
    /// Score `text` against every label in `labels`.
    ///
    /// Returns one score per requested label, in the backend's native order. No filtering.
    async fn classify(
        &self,
        text: &str,
        labels: &[ConcernLabel],
    ) -> Result<Vec<ConcernScore>, DomainError>;
}

/// Speech-to-text backend.
#[async_trait::async_trait]
pub trait TranscriberPort: Send + Sync {
    /// Transcribe the audio file at `audio_path`. Errors map to `DomainError::Transcription`.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, DomainError>;
}

/// Session persistence. Each call acquires and releases its own connection.
#[async_trait::async_trait]
pub trait SessionStorePort: Send + Sync {
    /// Insert a new session dated now. Returns its id.
    async fn create(&self, transcript: &str, summary: &str) -> Result<i64, DomainError>;

    /// Up to `limit` sessions, newest first.
    async fn list(&self, limit: u32) -> Result<Vec<SessionOverview>, DomainError>;

    /// Fetch one session. `DomainError::NotFound` if the id is unknown.
    async fn get(&self, id: i64) -> Result<Session, DomainError>;

    /// Overwrite the summary only; date and transcript are untouched.
    async fn update_summary(&self, id: i64, summary: &str) -> Result<(), DomainError>;
}
