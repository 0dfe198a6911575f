//! Repository port for workflows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::workflow::{TriggerType, Workflow};

/// Repository for persisting and querying automation workflows.
///
/// Implementations must return each workflow's actions pre-sorted by
/// `order` ascending; the executor relies on that and never reorders.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Create a new workflow with its conditions and actions.
    async fn create(&self, workflow: &Workflow) -> DomainResult<()>;

    /// Get a workflow by ID, conditions and actions included.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Workflow>>;

    /// List all workflows.
    async fn list(&self) -> DomainResult<Vec<Workflow>>;

    /// List active workflows for a trigger, in creation order.
    async fn list_active_by_trigger(&self, trigger: TriggerType) -> DomainResult<Vec<Workflow>>;

    /// Enable or disable a workflow.
    async fn set_active(&self, id: Uuid, is_active: bool) -> DomainResult<()>;

    /// Delete a workflow and its conditions and actions.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
