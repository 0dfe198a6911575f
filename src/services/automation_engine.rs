//! Rule-based automation engine.
//!
//! `AutomationEngine::run` is invoked by ticket mutation code paths after
//! they commit, with the post-mutation snapshot and the trigger type. It
//! loads the active workflows for that trigger, evaluates each workflow's
//! conditions, and executes matching workflows' actions in stored order.
//!
//! The engine is fire-and-forget: `run` never returns an error and never
//! panics across the boundary, so a broken workflow can never block the
//! ticket mutation that triggered it. Failures are isolated and logged at
//! three levels: per action, per workflow, and for the run as a whole.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::notification::Notification;
use crate::domain::models::ticket::{TicketPriority, TicketSnapshot, TicketStatus};
use crate::domain::models::workflow::{
    ActionPayload, ActionType, TriggerType, Workflow, WorkflowAction,
};
use crate::domain::ports::{NotificationRepository, TicketRepository, WorkflowRepository};
use crate::services::condition_matcher::all_conditions_match;

/// Trigger-driven workflow evaluator and action executor.
pub struct AutomationEngine {
    workflows: Arc<dyn WorkflowRepository>,
    tickets: Arc<dyn TicketRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl AutomationEngine {
    pub fn new(
        workflows: Arc<dyn WorkflowRepository>,
        tickets: Arc<dyn TicketRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            workflows,
            tickets,
            notifications,
        }
    }

    /// Run automation for a mutated ticket.
    ///
    /// Never fails: every internal error is logged and swallowed. Callers
    /// treat this as fire-and-forget relative to their own mutation.
    /// Workflows matched for the same trigger execute in creation order;
    /// conflicting writes are last-write-wins in that order.
    pub async fn run(&self, ticket: &TicketSnapshot, trigger: TriggerType) {
        if let Err(e) = self.run_checked(ticket, trigger).await {
            warn!(
                ticket = %ticket.ticket_number,
                trigger = trigger.as_str(),
                error = %e,
                "automation run aborted"
            );
        }
    }

    async fn run_checked(&self, ticket: &TicketSnapshot, trigger: TriggerType) -> DomainResult<()> {
        let workflows = self.workflows.list_active_by_trigger(trigger).await?;
        if workflows.is_empty() {
            debug!(trigger = trigger.as_str(), "no active workflows for trigger");
            return Ok(());
        }

        for workflow in &workflows {
            self.run_workflow(ticket, workflow).await;
        }
        Ok(())
    }

    /// Evaluate one workflow and execute its actions on a match.
    /// A failure here never affects sibling workflows.
    async fn run_workflow(&self, ticket: &TicketSnapshot, workflow: &Workflow) {
        if !all_conditions_match(ticket, &workflow.conditions) {
            debug!(
                workflow = %workflow.name,
                ticket = %ticket.ticket_number,
                "conditions not met, skipping workflow"
            );
            return;
        }

        info!(
            workflow = %workflow.name,
            ticket = %ticket.ticket_number,
            actions = workflow.actions.len(),
            "workflow matched, executing actions"
        );
        self.execute_actions(ticket, &workflow.actions, workflow.id).await;
    }

    /// Execute actions strictly in the given (pre-sorted) order.
    ///
    /// Each action is fail-isolated: a malformed payload, an unknown
    /// action type, or a failed write logs a warning and execution
    /// continues with the next action.
    pub async fn execute_actions(
        &self,
        ticket: &TicketSnapshot,
        actions: &[WorkflowAction],
        workflow_id: Uuid,
    ) {
        for action in actions {
            if let Err(e) = self.execute_action(ticket, action).await {
                warn!(
                    workflow_id = %workflow_id,
                    action_id = %action.id,
                    action_type = %action.action_type,
                    error = %e,
                    "action failed, continuing with remaining actions"
                );
            }
        }
    }

    async fn execute_action(
        &self,
        ticket: &TicketSnapshot,
        action: &WorkflowAction,
    ) -> DomainResult<()> {
        let Some(action_type) = ActionType::from_str(&action.action_type) else {
            warn!(
                action_type = %action.action_type,
                action_id = %action.id,
                "unknown action type, skipping"
            );
            return Ok(());
        };

        let payload = match ActionPayload::parse(action_type, &action.payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    action_type = action_type.as_str(),
                    action_id = %action.id,
                    error = %e,
                    "malformed action payload, skipping"
                );
                return Ok(());
            }
        };

        match payload {
            ActionPayload::AssignAgent { agent_id } => {
                self.tickets.assign(ticket.ticket_id, agent_id).await?;
                info!(ticket = %ticket.ticket_number, agent_id = %agent_id, "assigned agent");
            }
            ActionPayload::UpdateStatus { status } => {
                let Some(status) = TicketStatus::from_str(&status) else {
                    warn!(status = %status, "unknown status in payload, skipping");
                    return Ok(());
                };
                self.tickets.set_status(ticket.ticket_id, status).await?;
                info!(ticket = %ticket.ticket_number, status = status.as_str(), "updated status");
            }
            ActionPayload::SetPriority { priority } => {
                let Some(priority) = TicketPriority::from_str(&priority) else {
                    warn!(priority = %priority, "unknown priority in payload, skipping");
                    return Ok(());
                };
                self.tickets.set_priority(ticket.ticket_id, priority).await?;
                info!(ticket = %ticket.ticket_number, priority = priority.as_str(), "set priority");
            }
            ActionPayload::AddTag { tag_name, tag_id } => {
                // Reserved for the tagging subsystem.
                warn!(
                    ticket = %ticket.ticket_number,
                    tag_name = tag_name.as_deref().unwrap_or(""),
                    tag_id = ?tag_id,
                    "ADD_TAG is not implemented, skipping"
                );
            }
            ActionPayload::SendEmail { to, subject, .. } => {
                // Reserved until an outbound mail sink exists.
                warn!(
                    ticket = %ticket.ticket_number,
                    to = %to,
                    subject = %subject,
                    "SEND_EMAIL is not implemented, skipping"
                );
            }
            ActionPayload::SendNotification { user_id, title, message } => {
                let notification = Notification::new(user_id, "automation", title, message)
                    .with_link(format!("/tickets/{}", ticket.ticket_number));
                self.notifications.create(&notification).await?;
                info!(ticket = %ticket.ticket_number, user_id = %user_id, "sent notification");
            }
            ActionPayload::UpdateField { field, value } => {
                self.tickets.update_field(ticket.ticket_id, &field, &value).await?;
                info!(ticket = %ticket.ticket_number, field = %field, "updated field");
            }
        }

        Ok(())
    }
}
