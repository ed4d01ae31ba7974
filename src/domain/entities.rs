//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP, SQL or model types here. Adapters map into these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Excerpts at or below this many characters (after trimming) are discarded.
pub const MIN_EXCERPT_CHARS: usize = 10;

/// Full text of one therapy session, typed or transcribed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the transcript holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed concern taxonomy. Declaration order is the order labels are sent to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcernLabel {
    #[serde(rename = "anxiety")]
    Anxiety,
    #[serde(rename = "depression")]
    Depression,
    #[serde(rename = "relationships")]
    Relationships,
    #[serde(rename = "work stress")]
    WorkStress,
    #[serde(rename = "family issues")]
    FamilyIssues,
    #[serde(rename = "self-esteem")]
    SelfEsteem,
}

impl ConcernLabel {
    pub const ALL: [ConcernLabel; 6] = [
        ConcernLabel::Anxiety,
        ConcernLabel::Depression,
        ConcernLabel::Relationships,
        ConcernLabel::WorkStress,
        ConcernLabel::FamilyIssues,
        ConcernLabel::SelfEsteem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConcernLabel::Anxiety => "anxiety",
            ConcernLabel::Depression => "depression",
            ConcernLabel::Relationships => "relationships",
            ConcernLabel::WorkStress => "work stress",
            ConcernLabel::FamilyIssues => "family issues",
            ConcernLabel::SelfEsteem => "self-esteem",
        }
    }

    /// Parse a label as returned by a classifier. Case and surrounding whitespace are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Display strings for `labels`, in the given order.
    pub fn names(labels: &[Self]) -> Vec<&'static str> {
        labels.iter().map(|l| l.as_str()).collect()
    }
}

impl fmt::Display for ConcernLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier output: a label and its independent confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcernScore {
    pub label: ConcernLabel,
    pub score: f64,
}

impl ConcernScore {
    pub fn new(label: ConcernLabel, score: f64) -> Self {
        Self { label, score }
    }
}

/// Labels whose score cleared the concern threshold, in the classifier's return order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcernSet(Vec<ConcernLabel>);

impl ConcernSet {
    pub(crate) fn from_ordered(labels: Vec<ConcernLabel>) -> Self {
        Self(labels)
    }

    pub fn labels(&self) -> &[ConcernLabel] {
        &self.0
    }

    pub fn contains(&self, label: ConcernLabel) -> bool {
        self.0.contains(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConcernLabel> {
        self.0.iter()
    }
}

/// A sentence-snapped passage flagged as containing a realization marker.
///
/// Always trimmed and longer than [`MIN_EXCERPT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakthroughExcerpt(String);

impl BreakthroughExcerpt {
    /// Trim `raw` and accept it only if it is long enough to read as a passage.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (trimmed.chars().count() > MIN_EXCERPT_CHARS).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreakthroughExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of the extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightResult {
    pub concerns: ConcernSet,
    pub breakthroughs: Vec<BreakthroughExcerpt>,
}

/// Summary text plus insights for one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub summary: String,
    #[serde(flatten)]
    pub insights: InsightResult,
}

/// A persisted session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub date: String,
    pub transcript: String,
    pub summary: String,
}

/// Dashboard listing entry (no transcript).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOverview {
    pub id: i64,
    pub date: String,
    pub summary: String,
}
