//! Presentation helpers shared by the HTTP and terminal front-ends.

use crate::domain::{ConcernLabel, InsightResult};

/// Label shown in front of a generated summary.
pub const SUMMARY_LABEL: &str = "Summary of your therapy session:";

pub fn labelled_summary(summary: &str) -> String {
    format!("{}  {}", SUMMARY_LABEL, summary)
}

/// Concern labels as display strings, in result order.
pub fn concern_names(insights: &InsightResult) -> Vec<&'static str> {
    ConcernLabel::names(insights.concerns.labels())
}
