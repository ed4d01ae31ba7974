//! Mock model adapters for testing without API calls.
//!
//! Deterministic in-process stand-ins for the summarizer, classifier and transcriber.
//! Each can be told to fail so error paths can be exercised.

use crate::domain::{ConcernLabel, ConcernScore, DomainError};
use crate::ports::{ClassifierPort, SummarizerPort, SummaryParams, TranscriberPort};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Keyword cues per label for the heuristic mock classifier.
const KEYWORDS: &[(ConcernLabel, &[&str])] = &[
    (ConcernLabel::Anxiety, &["anxious", "anxiety", "panic", "worry", "nervous"]),
    (ConcernLabel::Depression, &["depressed", "hopeless", "sad", "empty", "numb"]),
    (ConcernLabel::Relationships, &["partner", "boyfriend", "girlfriend", "friend", "marriage"]),
    (ConcernLabel::WorkStress, &["job", "work", "boss", "deadline", "career"]),
    (
        ConcernLabel::FamilyIssues,
        &["mother", "father", "mom", "dad", "sister", "brother", "family"],
    ),
    (
        ConcernLabel::SelfEsteem,
        &["worthless", "not good enough", "confidence", "ashamed", "failure"],
    ),
];

async fn simulate_latency(delay_ms: u64) {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Mock summarizer. Echoes the leading words of the transcript.
#[derive(Default)]
pub struct MockSummarizer {
    delay_ms: u64,
    fail: bool,
    calls: AtomicUsize,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated network delay in milliseconds.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Every call returns `DomainError::Summarization`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of `summarize` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SummarizerPort for MockSummarizer {
    async fn summarize(&self, text: &str, params: SummaryParams) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(text_len = text.len(), "[MOCK] Simulating summarization");
        simulate_latency(self.delay_ms).await;
        if self.fail {
            return Err(DomainError::Summarization("[MOCK] summarizer unavailable".into()));
        }

        let words: Vec<&str> = text
            .split_whitespace()
            .take(params.max_length as usize)
            .collect();
        Ok(format!("[MOCK] {}", words.join(" ")))
    }
}

/// Mock classifier. Fixed scores when configured, keyword heuristic otherwise.
#[derive(Default)]
pub struct MockClassifier {
    scores: Option<Vec<ConcernScore>>,
    delay_ms: u64,
    fail: bool,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these scores first, in this order; unlisted labels follow with score 0.
    pub fn with_scores(scores: Vec<(ConcernLabel, f64)>) -> Self {
        Self {
            scores: Some(
                scores
                    .into_iter()
                    .map(|(label, score)| ConcernScore::new(label, score))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Every call returns `DomainError::Classification`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn heuristic(text: &str, label: ConcernLabel) -> f64 {
        let lower = text.to_lowercase();
        let hits = KEYWORDS
            .iter()
            .filter(|(l, _)| *l == label)
            .flat_map(|(_, words)| words.iter())
            .filter(|w| lower.contains(**w))
            .count();
        (hits as f64 * 0.35).min(1.0)
    }
}

#[async_trait::async_trait]
impl ClassifierPort for MockClassifier {
    async fn classify(
        &self,
        text: &str,
        labels: &[ConcernLabel],
    ) -> Result<Vec<ConcernScore>, DomainError> {
        info!(
            text_len = text.len(),
            labels = labels.len(),
            "[MOCK] Simulating classification"
        );
        simulate_latency(self.delay_ms).await;
        if self.fail {
            return Err(DomainError::Classification("[MOCK] classifier unavailable".into()));
        }

        let mut out: Vec<ConcernScore> = match &self.scores {
            Some(fixed) => fixed
                .iter()
                .filter(|s| labels.contains(&s.label))
                .copied()
                .collect(),
            None => labels
                .iter()
                .map(|&l| ConcernScore::new(l, Self::heuristic(text, l)))
                .collect(),
        };
        for &label in labels {
            if !out.iter().any(|s| s.label == label) {
                out.push(ConcernScore::new(label, 0.0));
            }
        }
        Ok(out)
    }
}

/// Mock transcriber. Returns fixed text and records which files it was handed.
#[derive(Default)]
pub struct MockTranscriber {
    text: Option<String>,
    fail: bool,
    seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Every call returns `DomainError::Transcription`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Paths passed to `transcribe`, each with whether the file existed at call time.
    pub fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().map(|s| s.to_vec()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TranscriberPort for MockTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, DomainError> {
        let exists = tokio::fs::try_exists(audio_path).await.unwrap_or(false);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((audio_path.to_path_buf(), exists));
        }
        info!(path = %audio_path.display(), "[MOCK] Simulating transcription");
        if self.fail {
            return Err(DomainError::Transcription("[MOCK] speech-to-text unavailable".into()));
        }
        Ok(self.text.clone().unwrap_or_else(|| {
            "[MOCK] Today I realized that I have been carrying a lot of worry about work. \
             My boss keeps moving deadlines and I feel anxious every Sunday night."
                .to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::SESSION_SUMMARY_PARAMS;

    #[tokio::test]
    async fn test_mock_summarizer_is_deterministic() {
        let s = MockSummarizer::new();
        let a = s.summarize("one two three", SESSION_SUMMARY_PARAMS).await.unwrap();
        let b = s.summarize("one two three", SESSION_SUMMARY_PARAMS).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "[MOCK] one two three");
        assert_eq!(s.calls(), 2);
    }

    #[tokio::test]
    async fn test_fixed_scores_cover_every_label() {
        let c = MockClassifier::with_scores(vec![(ConcernLabel::WorkStress, 0.81)]);
        let scores = c.classify("text", &ConcernLabel::ALL).await.unwrap();
        assert_eq!(scores.len(), 6);
        assert_eq!(scores[0], ConcernScore::new(ConcernLabel::WorkStress, 0.81));
        assert!(scores[1..].iter().all(|s| s.score == 0.0));
    }

    #[tokio::test]
    async fn test_heuristic_scores() {
        let c = MockClassifier::new();
        let scores = c
            .classify("My boss and my job keep me up at night", &ConcernLabel::ALL)
            .await
            .unwrap();
        let work = scores
            .iter()
            .find(|s| s.label == ConcernLabel::WorkStress)
            .unwrap();
        assert!(work.score > 0.3);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.score)));
    }

    #[tokio::test]
    async fn test_delay_is_applied_before_answering() {
        let s = MockSummarizer::new().with_delay(30);
        let c = MockClassifier::new().with_delay(30);
        let started = std::time::Instant::now();
        let summary = s.summarize("slow text", SESSION_SUMMARY_PARAMS).await.unwrap();
        let scores = c.classify("slow text", &ConcernLabel::ALL).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(summary, "[MOCK] slow text");
        assert_eq!(scores.len(), 6);
    }

    #[tokio::test]
    async fn test_failing_mocks() {
        assert!(matches!(
            MockSummarizer::failing()
                .summarize("x", SESSION_SUMMARY_PARAMS)
                .await,
            Err(DomainError::Summarization(_))
        ));
        assert!(matches!(
            MockClassifier::failing().classify("x", &ConcernLabel::ALL).await,
            Err(DomainError::Classification(_))
        ));
        assert!(matches!(
            MockTranscriber::failing().transcribe(Path::new("x.wav")).await,
            Err(DomainError::Transcription(_))
        ));
    }
}
