//! On-demand SLA evaluation.
//!
//! There is no timer thread: SLA state is re-derived from the ticket's
//! stored timestamps whenever a caller asks. Callers that find breaches
//! typically follow up by running automation with the `sla_breached`
//! trigger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::sla::{SlaState, SlaTarget};
use crate::domain::models::ticket::Ticket;
use crate::domain::ports::SlaPolicyRepository;

/// Derives SLA state for tickets from stored policies.
pub struct SlaService {
    policies: Arc<dyn SlaPolicyRepository>,
}

impl SlaService {
    pub fn new(policies: Arc<dyn SlaPolicyRepository>) -> Self {
        Self { policies }
    }

    /// Evaluate a ticket against the active policy for its priority.
    ///
    /// `None` when no policy covers the priority.
    pub async fn evaluate(
        &self,
        ticket: &Ticket,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<SlaState>> {
        let Some(policy) = self.policies.get_active_for_priority(ticket.priority).await? else {
            debug!(
                ticket = %ticket.ticket_number,
                priority = ticket.priority.as_str(),
                "no active SLA policy for priority"
            );
            return Ok(None);
        };

        Ok(Some(SlaState::derive(ticket, &policy, now)))
    }

    /// Targets currently breached for a ticket, empty when uncovered.
    pub async fn breaches(
        &self,
        ticket: &Ticket,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SlaTarget>> {
        Ok(self
            .evaluate(ticket, now)
            .await?
            .map(|state| state.breached_targets())
            .unwrap_or_default())
    }
}
