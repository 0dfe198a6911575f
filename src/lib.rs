//! Deskflow - Helpdesk Automation Core
//!
//! Deskflow is the automation core of a helpdesk system: a trigger-driven
//! workflow rule engine, a transactional leave/reassignment service,
//! on-demand SLA evaluation, and webhook delivery with a retry policy.
//! It is an in-process library: request handlers invoke it after
//! committing their own ticket mutations.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic, models, and ports
//! - **Service Layer** (`services`): The automation engine and policy services
//! - **Adapter Layer** (`adapters`): SQLite implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use deskflow::adapters::sqlite::{
//!     initialize_database, SqliteNotificationRepository, SqliteTicketRepository,
//!     SqliteWorkflowRepository,
//! };
//! use deskflow::domain::models::TriggerType;
//! use deskflow::services::AutomationEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = initialize_database("sqlite:.deskflow/deskflow.db").await?;
//!     let engine = AutomationEngine::new(
//!         Arc::new(SqliteWorkflowRepository::new(pool.clone())),
//!         Arc::new(SqliteTicketRepository::new(pool.clone())),
//!         Arc::new(SqliteNotificationRepository::new(pool)),
//!     );
//!     // After committing a ticket mutation:
//!     // engine.run(&ticket.snapshot()?, TriggerType::TicketCreated).await;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ActionPayload, ActionType, ActivityLog, Agent, AgentStatus, Condition, ConditionOperator,
    Config, DatabaseConfig, LeaveHistory, LeaveStatus, LoggingConfig, Notification, SlaPolicy,
    SlaState, SlaTarget, Ticket, TicketPriority, TicketSnapshot, TicketStatus, TriggerType,
    WebhookConfig, WebhookEndpoint, WebhookEvent, Workflow, WorkflowAction,
};
pub use domain::ports::{
    NotificationRepository, SlaPolicyRepository, TicketRepository, WebhookEndpointRepository,
    WorkflowRepository,
};
pub use infrastructure::{ConfigError, ConfigLoader};
pub use services::{
    AgentLeaveStatus, AutomationEngine, LeaveOutcome, LeaveService, SlaService, WebhookDispatcher,
};
