use crate::usecases::SessionService;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    /// Max sessions returned by the dashboard.
    pub dashboard_limit: u32,
}

impl AppState {
    pub fn new(sessions: Arc<SessionService>, dashboard_limit: u32) -> Self {
        Self {
            sessions,
            dashboard_limit,
        }
    }
}
