//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: an interactive front-end that drives the session use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the front-end until the user exits.
    async fn run(&self) -> Result<(), DomainError>;
}
