//! Core domain layer. No external I/O dependencies.
//!
//! Entities and the insight-extraction rules live here. Dependencies flow inward.

pub mod breakthrough;
pub mod concerns;
pub mod entities;
pub mod errors;

pub use breakthrough::{MAX_BREAKTHROUGHS, extract_breakthroughs};
pub use concerns::{CONCERN_THRESHOLD, filter_concerns};
pub use entities::{
    BreakthroughExcerpt, ConcernLabel, ConcernScore, ConcernSet, InsightResult, Session,
    SessionOverview, SessionSummary, Transcript,
};
pub use errors::DomainError;
