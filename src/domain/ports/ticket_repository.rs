//! Repository port for tickets.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::ticket::{Ticket, TicketPriority, TicketStatus};

/// Repository for persisting and mutating tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Create a new ticket.
    async fn create(&self, ticket: &Ticket) -> DomainResult<()>;

    /// Get a ticket by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Ticket>>;

    /// Get a ticket by its human-facing number.
    async fn get_by_number(&self, ticket_number: &str) -> DomainResult<Option<Ticket>>;

    /// Assign the ticket to an agent.
    async fn assign(&self, ticket_id: Uuid, agent_id: Uuid) -> DomainResult<()>;

    /// Set the ticket's status.
    async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> DomainResult<()>;

    /// Set the ticket's priority.
    async fn set_priority(&self, ticket_id: Uuid, priority: TicketPriority) -> DomainResult<()>;

    /// Update one mutable ticket field by name.
    ///
    /// Only a fixed allowlist of columns is writable this way; anything
    /// else fails with a validation error.
    async fn update_field(&self, ticket_id: Uuid, field: &str, value: &Value) -> DomainResult<()>;

    /// List tickets currently assigned to an agent.
    async fn list_assigned_to(&self, agent_id: Uuid) -> DomainResult<Vec<Ticket>>;
}
