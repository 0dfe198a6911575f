//! Domain models for the deskflow automation core.

pub mod activity;
pub mod agent;
pub mod config;
pub mod notification;
pub mod sla;
pub mod ticket;
pub mod webhook;
pub mod workflow;

pub use activity::ActivityLog;
pub use agent::{Agent, AgentStatus, LeaveHistory, LeaveStatus};
pub use config::{Config, DatabaseConfig, LoggingConfig, WebhookConfig};
pub use notification::Notification;
pub use sla::{SlaPolicy, SlaState, SlaTarget, SlaTimer};
pub use ticket::{Ticket, TicketPriority, TicketSnapshot, TicketStatus};
pub use webhook::{WebhookEndpoint, WebhookEvent};
pub use workflow::{
    ActionPayload, ActionType, Condition, ConditionOperator, TriggerType, Workflow, WorkflowAction,
};
