use super::handlers;
use super::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Largest accepted request body (audio uploads).
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Summarize
        .route("/summarize_text", post(handlers::summarize_text))
        .route("/transcribe_audio", post(handlers::transcribe_audio))
        // Browse
        .route("/dashboard", get(handlers::dashboard))
        .route("/view_session/:session_id", get(handlers::view_session))
        .route("/re_summarize/:session_id", post(handlers::re_summarize))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
