//! Breakthrough detection: lexical marker matching, sentence snapping, and collection.
//!
//! Pure functions over the transcript text. Offsets are byte offsets into the `&str`;
//! the context window is counted in characters so it never splits a code point.

use super::entities::BreakthroughExcerpt;
use regex::Regex;
use std::sync::LazyLock;

/// Characters of context added on each side of a marker before snapping.
pub const CONTEXT_WINDOW: usize = 150;

/// Maximum number of excerpts returned for one transcript.
pub const MAX_BREAKTHROUGHS: usize = 3;

const SENTENCE_DELIMITERS: &[u8] = b".!?";

/// Which marker family produced a match. Patterns are applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakthroughPattern {
    /// "(I) realized / understood / discovered / learned"
    Realization,
    /// "now I see / understand / know"
    NowISee,
    /// "it becomes / became clear"
    BecomesClear,
}

impl BreakthroughPattern {
    pub const ALL: [BreakthroughPattern; 3] = [
        BreakthroughPattern::Realization,
        BreakthroughPattern::NowISee,
        BreakthroughPattern::BecomesClear,
    ];

    fn regex(self) -> &'static Regex {
        &BREAKTHROUGH_PATTERNS[self as usize]
    }
}

/// Compiled marker patterns, indexed by `BreakthroughPattern as usize`.
static BREAKTHROUGH_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(?:I )?(?:realized|understood|discovered|learned)")
            .expect("realization pattern"),
        Regex::new(r"(?i)now I (?:see|understand|know)").expect("now-I-see pattern"),
        Regex::new(r"(?i)it (?:becomes|became) clear").expect("becomes-clear pattern"),
    ]
});

/// Raw span of one marker hit. Only lives for the duration of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakthroughMatch {
    pub start: usize,
    pub end: usize,
    pub pattern: BreakthroughPattern,
}

/// Lazily yield every marker hit. Patterns run in `BreakthroughPattern::ALL` order,
/// hits within a pattern left to right.
pub fn find_matches(text: &str) -> impl Iterator<Item = BreakthroughMatch> + '_ {
    BreakthroughPattern::ALL.into_iter().flat_map(move |pattern| {
        pattern.regex().find_iter(text).map(move |m| BreakthroughMatch {
            start: m.start(),
            end: m.end(),
            pattern,
        })
    })
}

/// Widen `[start, end)` by [`CONTEXT_WINDOW`] characters on each side, clipped to the text.
pub fn widen(text: &str, start: usize, end: usize) -> (usize, usize) {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(CONTEXT_WINDOW)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = end
        + text[end..]
            .chars()
            .take(CONTEXT_WINDOW)
            .map(char::len_utf8)
            .sum::<usize>();
    (lo, hi)
}

/// Expand `[lo, hi)` outward to sentence boundaries.
///
/// Start lands just after the nearest delimiter at or before `lo` (or 0); end lands just
/// after the nearest delimiter at or after `hi` (or the text end). Never slices or trims.
pub fn snap_to_sentences(text: &str, lo: usize, hi: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let lo = lo.min(bytes.len());
    let hi = hi.clamp(lo, bytes.len());

    let back_to = if lo < bytes.len() { lo + 1 } else { lo };
    let start = bytes[..back_to]
        .iter()
        .rposition(|b| SENTENCE_DELIMITERS.contains(b))
        .map_or(0, |i| i + 1);
    let end = bytes[hi..]
        .iter()
        .position(|b| SENTENCE_DELIMITERS.contains(b))
        .map_or(bytes.len(), |i| hi + i + 1);
    (start, end)
}

/// Accumulates excerpts in arrival order: drops short ones and exact repeats, stops at the cap.
#[derive(Debug)]
pub struct BreakthroughCollector {
    excerpts: Vec<BreakthroughExcerpt>,
    cap: usize,
}

impl BreakthroughCollector {
    pub fn new(cap: usize) -> Self {
        Self {
            excerpts: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Offer one raw snapped passage. Returns true if it was kept.
    pub fn offer(&mut self, raw: &str) -> bool {
        if self.is_full() {
            return false;
        }
        let Some(excerpt) = BreakthroughExcerpt::new(raw) else {
            return false;
        };
        if self.excerpts.contains(&excerpt) {
            return false;
        }
        self.excerpts.push(excerpt);
        true
    }

    pub fn is_full(&self) -> bool {
        self.excerpts.len() >= self.cap
    }

    pub fn into_excerpts(self) -> Vec<BreakthroughExcerpt> {
        self.excerpts
    }
}

/// Find, snap and collect up to [`MAX_BREAKTHROUGHS`] breakthrough passages.
pub fn extract_breakthroughs(text: &str) -> Vec<BreakthroughExcerpt> {
    let mut collector = BreakthroughCollector::new(MAX_BREAKTHROUGHS);
    for m in find_matches(text) {
        let (lo, hi) = widen(text, m.start, m.end);
        let (start, end) = snap_to_sentences(text, lo, hi);
        collector.offer(&text[start..end]);
        if collector.is_full() {
            break;
        }
    }
    collector.into_excerpts()
}
