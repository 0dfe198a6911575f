//! SLA policies and the states derived from them.
//!
//! SLA state is never stored and no clock thread runs: it is re-derived
//! from the ticket's stored timestamps whenever someone asks.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::ticket::{Ticket, TicketPriority};

/// An SLA policy applying to one ticket priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaPolicy {
    pub id: Uuid,
    pub name: String,
    pub priority: TicketPriority,
    pub first_response_hours: i64,
    pub resolution_hours: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SlaPolicy {
    pub fn new(
        name: impl Into<String>,
        priority: TicketPriority,
        first_response_hours: i64,
        resolution_hours: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            priority,
            first_response_hours,
            resolution_hours,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Which SLA target a timer tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaTarget {
    FirstResponse,
    Resolution,
}

impl SlaTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstResponse => "first_response",
            Self::Resolution => "resolution",
        }
    }
}

/// Derived state of one SLA timer at a point in time.
#[derive(Debug, Clone)]
pub struct SlaTimer {
    pub target: SlaTarget,
    pub deadline: DateTime<Utc>,
    /// When the target was met, if it has been.
    pub satisfied_at: Option<DateTime<Utc>>,
    /// Time left until the deadline (negative once past it). Meaningless
    /// for satisfied timers.
    pub remaining: Duration,
    pub breached: bool,
}

impl SlaTimer {
    /// Derive a timer from stored timestamps.
    ///
    /// A satisfied timer is breached iff the target was met after its
    /// deadline; an unsatisfied one is breached once `now` passes it.
    pub fn derive(
        target: SlaTarget,
        started_at: DateTime<Utc>,
        satisfied_at: Option<DateTime<Utc>>,
        allowed_hours: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let deadline = started_at + Duration::hours(allowed_hours);
        let breached = match satisfied_at {
            Some(at) => at > deadline,
            None => now > deadline,
        };
        Self {
            target,
            deadline,
            satisfied_at,
            remaining: deadline - now,
            breached,
        }
    }
}

/// Full SLA state of a ticket under one policy.
#[derive(Debug, Clone)]
pub struct SlaState {
    pub policy_id: Uuid,
    pub first_response: SlaTimer,
    pub resolution: SlaTimer,
}

impl SlaState {
    pub fn derive(ticket: &Ticket, policy: &SlaPolicy, now: DateTime<Utc>) -> Self {
        Self {
            policy_id: policy.id,
            first_response: SlaTimer::derive(
                SlaTarget::FirstResponse,
                ticket.created_at,
                ticket.first_response_at,
                policy.first_response_hours,
                now,
            ),
            resolution: SlaTimer::derive(
                SlaTarget::Resolution,
                ticket.created_at,
                ticket.resolved_at,
                policy.resolution_hours,
                now,
            ),
        }
    }

    /// Targets currently breached, in reporting order.
    pub fn breached_targets(&self) -> Vec<SlaTarget> {
        let mut out = Vec::new();
        if self.first_response.breached {
            out.push(SlaTarget::FirstResponse);
        }
        if self.resolution.breached {
            out.push(SlaTarget::Resolution);
        }
        out
    }
}
