//! Domain errors for the deskflow automation core.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the deskflow system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(Uuid),

    #[error("Agent not found: {0}")]
    AgentNotFound(Uuid),

    #[error("Agent {0} is already on leave")]
    AgentAlreadyOnLeave(Uuid),

    #[error("Workflow not found: {0}")]
    WorkflowNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Webhook delivery failed: {0}")]
    WebhookDeliveryFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
