//! Session summarizer. Summary text plus insights for one transcript.
//!
//! Source-agnostic: typed and transcribed transcripts go through the same path.
//! Runs the summarizer first, then the extractor; either failing fails the call.

use crate::domain::{DomainError, SessionSummary, Transcript};
use crate::ports::{SESSION_SUMMARY_PARAMS, SummarizerPort};
use crate::usecases::InsightExtractor;
use std::sync::Arc;
use tracing::info;

/// Orchestrates the summarizer port and the insight extractor.
pub struct SessionSummarizer {
    summarizer: Arc<dyn SummarizerPort>,
    extractor: Arc<InsightExtractor>,
}

impl SessionSummarizer {
    pub fn new(summarizer: Arc<dyn SummarizerPort>, extractor: Arc<InsightExtractor>) -> Self {
        Self {
            summarizer,
            extractor,
        }
    }

    /// Summary and insights for `transcript`.
    pub async fn summarize(&self, transcript: &Transcript) -> Result<SessionSummary, DomainError> {
        let summary = self.summary_text(transcript).await?;
        let insights = self.extractor.extract(transcript).await?;
        Ok(SessionSummary { summary, insights })
    }

    /// Summary text only, with the fixed session generation parameters.
    pub async fn summary_text(&self, transcript: &Transcript) -> Result<String, DomainError> {
        if transcript.is_blank() {
            return Err(DomainError::InvalidInput("transcript is empty".into()));
        }
        let summary = self
            .summarizer
            .summarize(transcript.as_str(), SESSION_SUMMARY_PARAMS)
            .await?;
        info!(
            transcript_len = transcript.as_str().len(),
            summary_len = summary.len(),
            "transcript summarized"
        );
        Ok(summary)
    }
}
