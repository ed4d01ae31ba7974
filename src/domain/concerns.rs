//! Concern thresholding. Turns a multi-label score vector into a [`ConcernSet`].

use super::entities::{ConcernScore, ConcernSet};

/// A label is a concern only when its score is strictly above this value.
pub const CONCERN_THRESHOLD: f64 = 0.3;

/// Keep labels scoring above [`CONCERN_THRESHOLD`], in the order the classifier returned them.
/// A label reported twice is kept once, at its first qualifying position.
pub fn filter_concerns(scores: &[ConcernScore]) -> ConcernSet {
    let mut labels = Vec::new();
    for s in scores {
        if s.score > CONCERN_THRESHOLD && !labels.contains(&s.label) {
            labels.push(s.label);
        }
    }
    ConcernSet::from_ordered(labels)
}
