//! Workflow domain model.
//!
//! A `Workflow` pairs a trigger with a set of conditions and an ordered
//! list of actions. Workflows are authored through an administrative
//! surface and are read-only inputs to the automation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket mutation that can trigger workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// A new ticket was created.
    TicketCreated,
    /// An existing ticket was updated.
    TicketUpdated,
    /// A ticket was assigned to an agent.
    TicketAssigned,
    /// A ticket's status changed.
    TicketStatusChanged,
    /// An SLA target on a ticket was breached.
    SlaBreached,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket_created",
            Self::TicketUpdated => "ticket_updated",
            Self::TicketAssigned => "ticket_assigned",
            Self::TicketStatusChanged => "ticket_status_changed",
            Self::SlaBreached => "sla_breached",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ticket_created" => Some(Self::TicketCreated),
            "ticket_updated" => Some(Self::TicketUpdated),
            "ticket_assigned" => Some(Self::TicketAssigned),
            "ticket_status_changed" => Some(Self::TicketStatusChanged),
            "sla_breached" => Some(Self::SlaBreached),
            _ => None,
        }
    }
}

/// Comparison operator recognized by the condition matcher.
///
/// Operators are stored as free text; anything outside this set evaluates
/// to a non-match at evaluation time rather than failing the whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    In,
    Changed,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::In => "in",
            Self::Changed => "changed",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }

    /// Parse a stored operator string, accepting the symbolic and
    /// `is_null` aliases used by older workflow definitions.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "equals" => Some(Self::Equals),
            "not_equals" => Some(Self::NotEquals),
            "in" => Some(Self::In),
            "changed" => Some(Self::Changed),
            "contains" => Some(Self::Contains),
            "not_contains" => Some(Self::NotContains),
            "greater_than" | ">" => Some(Self::GreaterThan),
            "less_than" | "<" => Some(Self::LessThan),
            "greater_than_or_equal" | ">=" => Some(Self::GreaterThanOrEqual),
            "less_than_or_equal" | "<=" => Some(Self::LessThanOrEqual),
            "is_empty" | "is_null" => Some(Self::IsEmpty),
            "is_not_empty" | "is_not_null" => Some(Self::IsNotEmpty),
            _ => None,
        }
    }
}

/// A single condition on a workflow.
///
/// `field` is a dot path into the ticket snapshot (e.g. `assignee.name`).
/// `value` is an operator-dependent literal, or a comma-separated list for
/// the `in` operator. The operator is kept as stored text so that an
/// unrecognized operator can be logged and fail closed instead of being
/// rejected at the persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub field: String,
    pub operator: String,
    pub value: Option<String>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id: Uuid::nil(),
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// Side effect recognized by the action executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    AssignAgent,
    UpdateStatus,
    SetPriority,
    AddTag,
    SendEmail,
    SendNotification,
    UpdateField,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssignAgent => "ASSIGN_AGENT",
            Self::UpdateStatus => "UPDATE_STATUS",
            Self::SetPriority => "SET_PRIORITY",
            Self::AddTag => "ADD_TAG",
            Self::SendEmail => "SEND_EMAIL",
            Self::SendNotification => "SEND_NOTIFICATION",
            Self::UpdateField => "UPDATE_FIELD",
        }
    }

    /// Parse a stored action type, matched case-insensitively.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ASSIGN_AGENT" => Some(Self::AssignAgent),
            "UPDATE_STATUS" => Some(Self::UpdateStatus),
            "SET_PRIORITY" => Some(Self::SetPriority),
            "ADD_TAG" => Some(Self::AddTag),
            "SEND_EMAIL" => Some(Self::SendEmail),
            "SEND_NOTIFICATION" => Some(Self::SendNotification),
            "UPDATE_FIELD" => Some(Self::UpdateField),
            _ => None,
        }
    }
}

/// Typed view of an action's JSON payload column.
///
/// Payloads are admin-authored JSON; field names follow the camelCase
/// convention of the workflow editor. Deserialization happens at the
/// execution boundary and a failure skips just that action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    AssignAgent {
        agent_id: Uuid,
    },
    UpdateStatus {
        status: String,
    },
    SetPriority {
        priority: String,
    },
    AddTag {
        tag_name: Option<String>,
        tag_id: Option<Uuid>,
    },
    SendEmail {
        to: String,
        subject: String,
        body: String,
    },
    SendNotification {
        user_id: Uuid,
        title: String,
        message: String,
    },
    UpdateField {
        field: String,
        value: serde_json::Value,
    },
}

impl ActionPayload {
    /// Deserialize a raw payload column for the given action type.
    pub fn parse(action_type: ActionType, raw: &str) -> Result<Self, serde_json::Error> {
        match action_type {
            ActionType::AssignAgent => {
                #[derive(Deserialize)]
                #[serde(rename_all = "camelCase")]
                struct P {
                    agent_id: Uuid,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::AssignAgent { agent_id: p.agent_id })
            }
            ActionType::UpdateStatus => {
                #[derive(Deserialize)]
                struct P {
                    status: String,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::UpdateStatus { status: p.status })
            }
            ActionType::SetPriority => {
                #[derive(Deserialize)]
                struct P {
                    priority: String,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::SetPriority { priority: p.priority })
            }
            ActionType::AddTag => {
                #[derive(Deserialize)]
                #[serde(rename_all = "camelCase")]
                struct P {
                    tag_name: Option<String>,
                    tag_id: Option<Uuid>,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::AddTag { tag_name: p.tag_name, tag_id: p.tag_id })
            }
            ActionType::SendEmail => {
                #[derive(Deserialize)]
                struct P {
                    to: String,
                    subject: String,
                    body: String,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::SendEmail { to: p.to, subject: p.subject, body: p.body })
            }
            ActionType::SendNotification => {
                #[derive(Deserialize)]
                #[serde(rename_all = "camelCase")]
                struct P {
                    user_id: Uuid,
                    title: String,
                    message: String,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::SendNotification {
                    user_id: p.user_id,
                    title: p.title,
                    message: p.message,
                })
            }
            ActionType::UpdateField => {
                #[derive(Deserialize)]
                struct P {
                    field: String,
                    value: serde_json::Value,
                }
                let p: P = serde_json::from_str(raw)?;
                Ok(Self::UpdateField { field: p.field, value: p.value })
            }
        }
    }
}

/// A single stored action on a workflow.
///
/// `order` defines the execution sequence within the workflow; repositories
/// return actions pre-sorted ascending and the executor never reorders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowAction {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub order: i64,
    pub action_type: String,
    pub payload: String,
}

impl WorkflowAction {
    pub fn new(order: i64, action_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id: Uuid::nil(),
            order,
            action_type: action_type.into(),
            payload: payload.into(),
        }
    }
}

/// A stored automation rule: trigger + conditions + ordered actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub trigger: TriggerType,
    pub is_active: bool,
    pub conditions: Vec<Condition>,
    pub actions: Vec<WorkflowAction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, trigger: TriggerType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            trigger,
            is_active: true,
            conditions: Vec::new(),
            actions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_condition(mut self, mut condition: Condition) -> Self {
        condition.workflow_id = self.id;
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, mut action: WorkflowAction) -> Self {
        action.workflow_id = self.id;
        self.actions.push(action);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_active = false;
        self
    }
}
