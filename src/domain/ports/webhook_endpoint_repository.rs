//! Repository port for webhook endpoints.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::webhook::WebhookEndpoint;

/// Repository for externally registered webhook endpoints.
#[async_trait]
pub trait WebhookEndpointRepository: Send + Sync {
    /// Register a new endpoint.
    async fn create(&self, endpoint: &WebhookEndpoint) -> DomainResult<()>;

    /// Active endpoints subscribed to an event name.
    async fn list_active_for_event(&self, event: &str) -> DomainResult<Vec<WebhookEndpoint>>;

    /// List all endpoints.
    async fn list(&self) -> DomainResult<Vec<WebhookEndpoint>>;
}
