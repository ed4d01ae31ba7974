//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// Speech-to-text failed. Separate from the summarizer and classifier errors.
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Session {0} not found")]
    NotFound(i64),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
