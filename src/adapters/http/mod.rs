//! HTTP front-end for summarizing and browsing sessions.
//!
//! - GET / - Entry form
//! - POST /summarize_text - Summarize a typed transcript (form field `text`)
//! - POST /transcribe_audio - Transcribe and summarize an upload (multipart field `audio`)
//! - GET /dashboard - Stored sessions, newest first
//! - GET /view_session/:id - One stored session
//! - POST /re_summarize/:id - Regenerate a stored session's summary

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
