//! Application use cases. Orchestrate domain logic via ports.

pub mod insight_extractor;
pub mod session_service;
pub mod session_summarizer;

pub use insight_extractor::InsightExtractor;
pub use session_service::{SessionService, SummarizedSession};
pub use session_summarizer::SessionSummarizer;
