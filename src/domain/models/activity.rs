//! Ticket activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row in a ticket's activity trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub activity_type: String,
    pub detail: String,
    pub actor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(
        ticket_id: Uuid,
        activity_type: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            activity_type: activity_type.into(),
            detail: detail.into(),
            actor_id: None,
            created_at: Utc::now(),
        }
    }
}
