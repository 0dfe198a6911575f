//! Webhook endpoints and the event envelope delivered to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::ticket::TicketSnapshot;
use crate::domain::models::workflow::TriggerType;

/// An externally registered webhook receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    pub id: Uuid,
    pub url: String,
    /// Shared token sent as `x-deskflow-token` on every delivery.
    pub secret: String,
    /// Event names this endpoint subscribes to.
    pub events: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl WebhookEndpoint {
    pub fn new(url: impl Into<String>, secret: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            secret: secret.into(),
            events,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn subscribes_to(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event)
    }
}

/// JSON envelope POSTed to subscribed endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEvent {
    pub id: Uuid,
    pub event: String,
    pub ticket_id: Uuid,
    pub ticket_number: String,
    pub occurred_at: DateTime<Utc>,
    /// The post-mutation ticket, verbatim.
    pub data: Value,
}

impl WebhookEvent {
    /// Envelope for a ticket trigger, embedding the snapshot's JSON tree.
    pub fn for_trigger(trigger: TriggerType, ticket: &TicketSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            event: trigger.as_str().to_string(),
            ticket_id: ticket.ticket_id,
            ticket_number: ticket.ticket_number.clone(),
            occurred_at: Utc::now(),
            data: ticket.fields().clone(),
        }
    }
}
