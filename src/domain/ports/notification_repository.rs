//! Repository port for notifications.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::notification::Notification;

/// Sink for notifications targeted at users.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification for later retrieval by the recipient.
    async fn create(&self, notification: &Notification) -> DomainResult<()>;

    /// List a user's notifications, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Notification>>;

    /// Mark a notification as read.
    async fn mark_read(&self, id: Uuid) -> DomainResult<()>;
}
