//! Repository port for SLA policies.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::sla::SlaPolicy;
use crate::domain::models::ticket::TicketPriority;

/// Repository for SLA policies.
#[async_trait]
pub trait SlaPolicyRepository: Send + Sync {
    /// Create a new policy.
    async fn create(&self, policy: &SlaPolicy) -> DomainResult<()>;

    /// The active policy for a priority, if one exists.
    async fn get_active_for_priority(
        &self,
        priority: TicketPriority,
    ) -> DomainResult<Option<SlaPolicy>>;

    /// List all policies.
    async fn list(&self) -> DomainResult<Vec<SlaPolicy>>;
}
