use super::state::AppState;
use crate::domain::DomainError;
use crate::shared::display::{concern_names, labelled_summary};
use crate::usecases::SummarizedSession;
use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SummarizeTextForm {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub session_id: i64,
    pub summary: String,
    pub concerns: Vec<&'static str>,
    pub breakthroughs: Vec<String>,
    /// Present for audio uploads so the caller can see what was heard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl SummaryView {
    fn new(done: SummarizedSession, include_transcript: bool) -> Self {
        Self {
            session_id: done.session_id,
            summary: labelled_summary(&done.result.summary),
            concerns: concern_names(&done.result.insights),
            breakthroughs: done
                .result
                .insights
                .breakthroughs
                .iter()
                .map(|b| b.as_str().to_string())
                .collect(),
            transcript: include_transcript.then(|| done.transcript.into_inner()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Domain error carried out of a handler.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Classification(_)
            | DomainError::Summarization(_)
            | DomainError::Transcription(_) => StatusCode::BAD_GATEWAY,
            DomainError::Repo(_) | DomainError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        } else {
            warn!(status = %status, error = %self.0, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Session Insight</title></head>
<body>
<h1>Session Insight</h1>
<form action="/summarize_text" method="post">
  <textarea name="text" rows="12" cols="80" placeholder="Paste the session transcript"></textarea><br>
  <button type="submit">Summarize</button>
</form>
<form action="/transcribe_audio" method="post" enctype="multipart/form-data">
  <input type="file" name="audio" accept="audio/*">
  <button type="submit">Transcribe &amp; summarize</button>
</form>
<p><a href="/dashboard">Past sessions</a></p>
</body>
</html>"#;

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /summarize_text
pub async fn summarize_text(
    State(state): State<AppState>,
    Form(form): Form<SummarizeTextForm>,
) -> Result<Json<SummaryView>, ApiError> {
    info!(text_len = form.text.len(), "summarize text request");
    let done = state.sessions.summarize_text(&form.text).await?;
    Ok(Json(SummaryView::new(done, false)))
}

/// POST /transcribe_audio
/// Expects the recording in multipart field `audio`.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SummaryView>, ApiError> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::InvalidInput(format!("multipart: {}", e)))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| DomainError::InvalidInput(format!("audio field: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }
    let (file_name, audio) =
        upload.ok_or_else(|| DomainError::InvalidInput("missing 'audio' field".into()))?;

    info!(bytes = audio.len(), file_name = ?file_name, "audio upload received");
    let done = state
        .sessions
        .summarize_audio(&audio, file_name.as_deref())
        .await?;
    Ok(Json(SummaryView::new(done, true)))
}

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.sessions.list_sessions(state.dashboard_limit).await?;
    Ok(Json(sessions))
}

/// GET /view_session/:session_id
/// Unknown ids redirect to the dashboard.
pub async fn view_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    match state.sessions.get_session(session_id).await {
        Ok(session) => Json(session).into_response(),
        Err(DomainError::NotFound(_)) => {
            info!(session_id, "unknown session, redirecting to dashboard");
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /re_summarize/:session_id
pub async fn re_summarize(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.re_summarize(session_id).await?;
    Ok(Json(session))
}
