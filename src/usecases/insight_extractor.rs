//! Insight extraction: concern tags from the classifier plus breakthrough passages.
//!
//! - Scores the transcript against the full concern taxonomy
//! - Keeps labels above the concern threshold, in classifier order
//! - Runs the lexical breakthrough pipeline over the same text
//!
//! A classifier failure aborts the whole extraction; no partial result is returned.

use crate::domain::{
    ConcernLabel, DomainError, InsightResult, Transcript, extract_breakthroughs, filter_concerns,
};
use crate::ports::ClassifierPort;
use std::sync::Arc;
use tracing::{debug, info};

/// Insight extractor. Combines the classifier port with the pure breakthrough rules.
pub struct InsightExtractor {
    classifier: Arc<dyn ClassifierPort>,
}

impl InsightExtractor {
    pub fn new(classifier: Arc<dyn ClassifierPort>) -> Self {
        Self { classifier }
    }

    pub async fn extract(&self, transcript: &Transcript) -> Result<InsightResult, DomainError> {
        let text = transcript.as_str();
        let scores = self.classifier.classify(text, &ConcernLabel::ALL).await?;
        debug!(?scores, "concern scores");
        let concerns = filter_concerns(&scores);

        let breakthroughs = extract_breakthroughs(text);

        info!(
            concerns = concerns.len(),
            breakthroughs = breakthroughs.len(),
            "insights extracted"
        );
        Ok(InsightResult {
            concerns,
            breakthroughs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockClassifier;

    const SCENARIO: &str =
        "Today I realized that my job is the source of my stress. I need to set boundaries.";

    fn extractor(classifier: MockClassifier) -> InsightExtractor {
        InsightExtractor::new(Arc::new(classifier))
    }

    #[tokio::test]
    async fn test_work_stress_scenario() {
        let ex = extractor(MockClassifier::with_scores(vec![
            (ConcernLabel::WorkStress, 0.81),
            (ConcernLabel::SelfEsteem, 0.2),
        ]));
        let result = ex.extract(&Transcript::new(SCENARIO)).await.unwrap();

        assert_eq!(result.concerns.labels(), &[ConcernLabel::WorkStress]);
        assert_eq!(result.breakthroughs.len(), 1);
        assert!(
            result.breakthroughs[0]
                .as_str()
                .contains("Today I realized that my job is the source of my stress.")
        );
    }

    #[tokio::test]
    async fn test_no_markers_no_breakthroughs() {
        let ex = extractor(MockClassifier::with_scores(vec![]));
        let result = ex
            .extract(&Transcript::new("We talked about the weekend. It was calm."))
            .await
            .unwrap();
        assert!(result.breakthroughs.is_empty());
        assert!(result.concerns.is_empty());
    }

    #[tokio::test]
    async fn test_classifier_failure_is_fatal() {
        let ex = extractor(MockClassifier::failing());
        let err = ex.extract(&Transcript::new(SCENARIO)).await.unwrap_err();
        assert!(matches!(err, DomainError::Classification(_)));
    }

    #[tokio::test]
    async fn test_extraction_is_idempotent() {
        let ex = extractor(MockClassifier::new());
        let t = Transcript::new(
            "My boss is impossible. Now I understand why I dread Mondays. It became clear last week.",
        );
        let a = ex.extract(&t).await.unwrap();
        let b = ex.extract(&t).await.unwrap();
        assert_eq!(a, b);
    }
}
