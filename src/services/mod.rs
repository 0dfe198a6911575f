//! Services: the automation engine and its sibling policy services.

pub mod automation_engine;
pub mod condition_matcher;
pub mod leave_service;
pub mod sla_service;
pub mod webhook_dispatcher;

pub use automation_engine::AutomationEngine;
pub use condition_matcher::{all_conditions_match, matches_condition};
pub use leave_service::{AgentLeaveStatus, LeaveOutcome, LeaveService};
pub use sla_service::SlaService;
pub use webhook_dispatcher::WebhookDispatcher;
