//! Ticket domain model and the snapshot view consumed by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Status of a ticket in the support pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly created, awaiting triage
    Open,
    /// Waiting on the requester
    Pending,
    /// An agent is actively working the ticket
    InProgress,
    /// Work finished, awaiting confirmation
    Resolved,
    /// Closed out
    Closed,
}

impl Default for TicketStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Resolved and closed tickets are terminal: they are excluded from
    /// reassignment cascades and SLA evaluation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

/// Priority level for tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low = 1,
    Normal = 2,
    High = 3,
    Urgent = 4,
}

impl Default for TicketPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// A support ticket as stored.
///
/// Serializes with camelCase keys, the same shape the workflow editor
/// exposes to condition authors, so stored dot paths like `assigneeId`
/// resolve against snapshots without translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub ticket_number: String,
    pub subject: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub previous_owner_id: Option<Uuid>,
    pub is_claimable: bool,
    pub unassigned_reason: Option<String>,
    pub first_response_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(ticket_number: impl Into<String>, subject: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            ticket_number: ticket_number.into(),
            subject: subject.into(),
            description: None,
            status: TicketStatus::default(),
            priority: TicketPriority::default(),
            category: None,
            tags: Vec::new(),
            requester_name: None,
            requester_email: None,
            assignee_id: None,
            previous_owner_id: None,
            is_claimable: false,
            unassigned_reason: None,
            first_response_at: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot the post-mutation state for condition matching.
    pub fn snapshot(&self) -> DomainResult<TicketSnapshot> {
        Ok(TicketSnapshot {
            ticket_id: self.id,
            ticket_number: self.ticket_number.clone(),
            fields: serde_json::to_value(self)?,
            changed_fields: None,
        })
    }
}

/// The mutated ticket as seen by the automation engine.
///
/// Wraps the post-mutation ticket as a JSON tree reachable by dot path,
/// plus the optional list of field paths that changed in the triggering
/// mutation. The engine never diffs on its own: without `changed_fields`
/// the `changed` operator always evaluates false.
#[derive(Debug, Clone)]
pub struct TicketSnapshot {
    pub ticket_id: Uuid,
    pub ticket_number: String,
    fields: Value,
    changed_fields: Option<Vec<String>>,
}

impl TicketSnapshot {
    /// Build a snapshot from an arbitrary JSON tree. Caller-owned ticket
    /// shapes (joined relations, computed fields) resolve the same way.
    pub fn from_value(ticket_id: Uuid, ticket_number: impl Into<String>, fields: Value) -> Self {
        Self {
            ticket_id,
            ticket_number: ticket_number.into(),
            fields,
            changed_fields: None,
        }
    }

    pub fn with_changed_fields(mut self, changed: Vec<String>) -> Self {
        self.changed_fields = Some(changed);
        self
    }

    /// Walk a dot path through the snapshot. Any missing or null
    /// intermediate short-circuits to `None`.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut current = &self.fields;
        for segment in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(segment)?;
                }
                _ => return None,
            }
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }

    /// True iff the triggering mutation reported this exact path as changed.
    pub fn field_changed(&self, path: &str) -> bool {
        self.changed_fields
            .as_ref()
            .is_some_and(|changed| changed.iter().any(|f| f == path))
    }

    /// The underlying JSON tree (webhook envelopes embed it verbatim).
    pub fn fields(&self) -> &Value {
        &self.fields
    }
}
