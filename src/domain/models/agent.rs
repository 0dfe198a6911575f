//! Agent availability model and leave history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Availability state of a support agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    OnLeave,
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "on_leave" => Some(Self::OnLeave),
            _ => None,
        }
    }
}

/// A support agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AgentStatus,
    pub leave_from: Option<DateTime<Utc>>,
    pub leave_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            status: AgentStatus::default(),
            leave_from: None,
            leave_to: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// State of a leave history row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    OnLeave,
    Returned,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnLeave => "on_leave",
            Self::Returned => "returned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "on_leave" => Some(Self::OnLeave),
            "returned" => Some(Self::Returned),
            _ => None,
        }
    }
}

/// One leave episode for an agent.
///
/// `end_date` stays null while the leave is ongoing; at most one open row
/// exists per agent at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveHistory {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: LeaveStatus,
}
