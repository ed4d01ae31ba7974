//! Session use cases: summarize typed or recorded sessions, browse them, re-summarize.
//!
//! Coordinates the transcriber, the session summarizer and the session store.

use crate::domain::{DomainError, Session, SessionOverview, SessionSummary, Transcript};
use crate::ports::{SessionStorePort, TranscriberPort};
use crate::usecases::SessionSummarizer;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// A freshly summarized and stored session.
#[derive(Debug, Clone)]
pub struct SummarizedSession {
    pub session_id: i64,
    pub transcript: Transcript,
    pub result: SessionSummary,
}

/// Service for creating, browsing and re-summarizing sessions.
pub struct SessionService {
    summarizer: Arc<SessionSummarizer>,
    transcriber: Arc<dyn TranscriberPort>,
    store: Arc<dyn SessionStorePort>,
}

impl SessionService {
    pub fn new(
        summarizer: Arc<SessionSummarizer>,
        transcriber: Arc<dyn TranscriberPort>,
        store: Arc<dyn SessionStorePort>,
    ) -> Self {
        Self {
            summarizer,
            transcriber,
            store,
        }
    }

    /// Summarize a typed transcript and store it as a new session.
    pub async fn summarize_text(&self, text: &str) -> Result<SummarizedSession, DomainError> {
        self.summarize_and_store(Transcript::new(text)).await
    }

    /// Transcribe uploaded audio, then summarize and store it.
    ///
    /// The bytes are spooled to a temp file that is removed when this call returns,
    /// whether transcription succeeded or not.
    pub async fn summarize_audio(
        &self,
        audio: &[u8],
        file_name: Option<&str>,
    ) -> Result<SummarizedSession, DomainError> {
        if audio.is_empty() {
            return Err(DomainError::InvalidInput("audio upload is empty".into()));
        }
        let suffix = file_name
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut spool = tempfile::Builder::new()
            .prefix("session-audio-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| DomainError::Transcription(format!("temp file: {}", e)))?;
        spool
            .write_all(audio)
            .and_then(|_| spool.flush())
            .map_err(|e| DomainError::Transcription(format!("temp file write: {}", e)))?;
        info!(bytes = audio.len(), path = %spool.path().display(), "audio spooled");

        let text = self.transcribe(spool.path()).await;
        if let Err(e) = spool.close() {
            warn!(error = %e, "failed to remove temp audio file");
        }
        self.summarize_and_store(Transcript::new(text?)).await
    }

    /// Transcribe an audio file already on disk, then summarize and store it.
    pub async fn summarize_audio_file(
        &self,
        audio_path: &Path,
    ) -> Result<SummarizedSession, DomainError> {
        let text = self.transcribe(audio_path).await?;
        self.summarize_and_store(Transcript::new(text)).await
    }

    /// Up to `limit` sessions, newest first.
    pub async fn list_sessions(&self, limit: u32) -> Result<Vec<SessionOverview>, DomainError> {
        self.store.list(limit).await
    }

    pub async fn get_session(&self, id: i64) -> Result<Session, DomainError> {
        self.store.get(id).await
    }

    /// Regenerate the stored summary from the stored transcript.
    ///
    /// Only the summary changes; insights are not recomputed and nothing else is written.
    pub async fn re_summarize(&self, id: i64) -> Result<Session, DomainError> {
        let session = self.store.get(id).await?;
        let summary = self
            .summarizer
            .summary_text(&Transcript::new(session.transcript.as_str()))
            .await?;
        self.store.update_summary(id, &summary).await?;
        info!(session_id = id, "session re-summarized");
        Ok(Session { summary, ..session })
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String, DomainError> {
        let text = self.transcriber.transcribe(audio_path).await?;
        if text.trim().is_empty() {
            return Err(DomainError::Transcription("empty transcript".into()));
        }
        Ok(text)
    }

    async fn summarize_and_store(
        &self,
        transcript: Transcript,
    ) -> Result<SummarizedSession, DomainError> {
        let result = self.summarizer.summarize(&transcript).await?;
        let session_id = self
            .store
            .create(transcript.as_str(), &result.summary)
            .await?;
        Ok(SummarizedSession {
            session_id,
            transcript,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockClassifier, MockSummarizer, MockTranscriber};
    use crate::adapters::persistence::SqliteRepo;
    use crate::domain::ConcernLabel;
    use crate::ports::SessionStorePort;
    use crate::usecases::InsightExtractor;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: SessionService,
        store: Arc<SqliteRepo>,
        summarizer: Arc<MockSummarizer>,
        transcriber: Arc<MockTranscriber>,
    }

    async fn fixture(summarizer: MockSummarizer, transcriber: MockTranscriber) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteRepo::connect(dir.path()).await.unwrap());
        let summarizer = Arc::new(summarizer);
        let transcriber = Arc::new(transcriber);
        let extractor = Arc::new(InsightExtractor::new(Arc::new(
            MockClassifier::with_scores(vec![(ConcernLabel::FamilyIssues, 0.7)]),
        )));
        let session_summarizer = Arc::new(SessionSummarizer::new(summarizer.clone(), extractor));
        let service = SessionService::new(session_summarizer, transcriber.clone(), store.clone());
        Fixture {
            _dir: dir,
            service,
            store,
            summarizer,
            transcriber,
        }
    }

    #[tokio::test]
    async fn test_summarize_text_stores_session() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::new()).await;
        let out = f
            .service
            .summarize_text("My dad and I argued. I learned to walk away.")
            .await
            .unwrap();
        assert_eq!(
            out.result.insights.concerns.labels(),
            &[ConcernLabel::FamilyIssues]
        );

        let stored = f.service.get_session(out.session_id).await.unwrap();
        assert_eq!(stored.transcript, out.transcript.as_str());
        assert_eq!(stored.summary, out.result.summary);
    }

    #[tokio::test]
    async fn test_audio_temp_file_removed_on_success() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::new()).await;
        let out = f
            .service
            .summarize_audio(b"RIFF....", Some("session.wav"))
            .await
            .unwrap();
        assert!(out.transcript.as_str().contains("I realized"));

        let seen = f.transcriber.seen();
        assert_eq!(seen.len(), 1);
        let (path, existed) = &seen[0];
        assert!(*existed);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_audio_temp_file_removed_on_failure() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::failing()).await;
        let err = f
            .service
            .summarize_audio(b"bytes", Some("clip.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Transcription(_)));

        let seen = f.transcriber.seen();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].1);
        assert!(!seen[0].0.exists());
        assert!(f.service.list_sessions(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_audio_and_empty_transcript_rejected() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::with_text("   ")).await;
        assert!(matches!(
            f.service.summarize_audio(b"", None).await,
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            f.service.summarize_audio(b"xx", None).await,
            Err(DomainError::Transcription(_))
        ));
    }

    #[tokio::test]
    async fn test_re_summarize_updates_summary_only() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::new()).await;
        let out = f
            .service
            .summarize_text("Work has been heavy lately. Now I know what to ask for.")
            .await
            .unwrap();
        f.store.update_summary(out.session_id, "stale").await.unwrap();
        let before = f.service.get_session(out.session_id).await.unwrap();
        assert_eq!(f.summarizer.calls(), 1);

        let updated = f.service.re_summarize(out.session_id).await.unwrap();
        let after = f.service.get_session(out.session_id).await.unwrap();

        assert_eq!(f.summarizer.calls(), 2);
        assert_eq!(after, updated);
        assert_eq!(after.summary, out.result.summary);
        assert_ne!(after.summary, before.summary);
        assert_eq!(after.transcript, before.transcript);
        assert_eq!(after.date, before.date);
    }

    #[tokio::test]
    async fn test_re_summarize_unknown_session() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::new()).await;
        assert!(matches!(
            f.service.re_summarize(999).await,
            Err(DomainError::NotFound(999))
        ));
        assert_eq!(f.summarizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let f = fixture(MockSummarizer::new(), MockTranscriber::new()).await;
        let a = f.service.summarize_text("first session text").await.unwrap();
        let b = f.service.summarize_text("second session text").await.unwrap();
        let listed = f.service.list_sessions(1024).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, b.session_id);
        assert_eq!(listed[1].id, a.session_id);
    }
}
