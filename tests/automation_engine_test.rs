mod helpers;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use deskflow::adapters::sqlite::{
    SqliteNotificationRepository, SqliteTicketRepository, SqliteWorkflowRepository,
};
use deskflow::domain::errors::{DomainError, DomainResult};
use deskflow::domain::models::{
    Condition, Ticket, TicketPriority, TicketStatus, TriggerType, Workflow, WorkflowAction,
};
use deskflow::domain::ports::{
    NotificationRepository, TicketRepository, WorkflowRepository,
};
use deskflow::services::AutomationEngine;

use helpers::database::{setup_test_db, teardown_test_db};

fn engine_over(pool: &sqlx::SqlitePool) -> AutomationEngine {
    AutomationEngine::new(
        Arc::new(SqliteWorkflowRepository::new(pool.clone())),
        Arc::new(SqliteTicketRepository::new(pool.clone())),
        Arc::new(SqliteNotificationRepository::new(pool.clone())),
    )
}

#[tokio::test]
async fn matching_workflow_executes_its_actions() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());

    let agent_id = Uuid::new_v4();
    let workflow = Workflow::new("urgent-fast-lane", TriggerType::TicketCreated)
        .with_condition(Condition::new("priority", "equals", Some("urgent".into())))
        .with_action(WorkflowAction::new(
            1,
            "ASSIGN_AGENT",
            format!(r#"{{"agentId": "{agent_id}"}}"#),
        ))
        .with_action(WorkflowAction::new(
            2,
            "UPDATE_STATUS",
            r#"{"status": "in_progress"}"#,
        ));
    workflows.create(&workflow).await.expect("create workflow");

    let mut ticket = Ticket::new("TCK-1", "Everything is down");
    ticket.priority = TicketPriority::Urgent;
    tickets.create(&ticket).await.expect("create ticket");

    let engine = engine_over(&pool);
    engine
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketCreated)
        .await;

    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.assignee_id, Some(agent_id));
    assert_eq!(stored.status, TicketStatus::InProgress);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn non_matching_workflow_is_skipped() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());

    let workflow = Workflow::new("urgent-only", TriggerType::TicketCreated)
        .with_condition(Condition::new("priority", "equals", Some("urgent".into())))
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "high"}"#));
    workflows.create(&workflow).await.expect("create workflow");

    let ticket = Ticket::new("TCK-2", "Minor nit");
    tickets.create(&ticket).await.expect("create ticket");

    engine_over(&pool)
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketCreated)
        .await;

    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, TicketPriority::Normal);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn send_notification_persists_a_linked_notification() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());
    let notifications = SqliteNotificationRepository::new(pool.clone());

    let user_id = Uuid::new_v4();
    let workflow = Workflow::new("notify-supervisor", TriggerType::TicketAssigned)
        .with_action(WorkflowAction::new(
            1,
            "SEND_NOTIFICATION",
            format!(
                r#"{{"userId": "{user_id}", "title": "Ticket assigned", "message": "Keep an eye on it"}}"#
            ),
        ));
    workflows.create(&workflow).await.expect("create workflow");

    let ticket = Ticket::new("TCK-3", "Password reset");
    tickets.create(&ticket).await.expect("create ticket");

    engine_over(&pool)
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketAssigned)
        .await;

    let inbox = notifications.list_for_user(user_id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Ticket assigned");
    assert_eq!(inbox[0].link.as_deref(), Some("/tickets/TCK-3"));
    assert!(!inbox[0].is_read);

    notifications.mark_read(inbox[0].id).await.unwrap();
    let inbox = notifications.list_for_user(user_id).await.unwrap();
    assert!(inbox[0].is_read);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn malformed_payload_does_not_stop_sibling_actions() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());

    let workflow = Workflow::new("broken-middle", TriggerType::TicketUpdated)
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "high"}"#))
        .with_action(WorkflowAction::new(2, "UPDATE_STATUS", "{not json at all"))
        .with_action(WorkflowAction::new(3, "UPDATE_FIELD", r#"{"field": "category", "value": "network"}"#));
    workflows.create(&workflow).await.expect("create workflow");

    let ticket = Ticket::new("TCK-4", "Flaky VPN");
    tickets.create(&ticket).await.expect("create ticket");

    engine_over(&pool)
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketUpdated)
        .await;

    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, TicketPriority::High);
    assert_eq!(stored.category.as_deref(), Some("network"));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn unknown_action_type_and_reserved_actions_are_noops() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());

    let workflow = Workflow::new("future-features", TriggerType::TicketCreated)
        .with_action(WorkflowAction::new(1, "DELETE_TICKET", "{}"))
        .with_action(WorkflowAction::new(2, "ADD_TAG", r#"{"tagName": "vip"}"#))
        .with_action(WorkflowAction::new(
            3,
            "SEND_EMAIL",
            r#"{"to": "ops@example.com", "subject": "hi", "body": "text"}"#,
        ))
        .with_action(WorkflowAction::new(4, "UPDATE_STATUS", r#"{"status": "pending"}"#));
    workflows.create(&workflow).await.expect("create workflow");

    let ticket = Ticket::new("TCK-5", "Tag me");
    tickets.create(&ticket).await.expect("create ticket");

    engine_over(&pool)
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketCreated)
        .await;

    // The only observable mutation comes from the real action at the end.
    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TicketStatus::Pending);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn conflicting_workflows_resolve_last_write_wins_in_creation_order() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());

    let first = Workflow::new("bump-to-high", TriggerType::TicketCreated)
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "high"}"#));
    workflows.create(&first).await.expect("create first");

    let mut second = Workflow::new("bump-to-urgent", TriggerType::TicketCreated)
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "urgent"}"#));
    second.created_at = first.created_at + chrono::Duration::seconds(1);
    second.updated_at = second.created_at;
    workflows.create(&second).await.expect("create second");

    let ticket = Ticket::new("TCK-6", "Contested priority");
    tickets.create(&ticket).await.expect("create ticket");

    engine_over(&pool)
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketCreated)
        .await;

    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, TicketPriority::Urgent);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn changed_operator_requires_the_caller_supplied_change_list() {
    let pool = setup_test_db().await;
    let workflows = SqliteWorkflowRepository::new(pool.clone());
    let tickets = SqliteTicketRepository::new(pool.clone());

    let workflow = Workflow::new("status-watch", TriggerType::TicketUpdated)
        .with_condition(Condition::new("status", "changed", None))
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "high"}"#));
    workflows.create(&workflow).await.expect("create workflow");

    let ticket = Ticket::new("TCK-7", "Watched ticket");
    tickets.create(&ticket).await.expect("create ticket");
    let engine = engine_over(&pool);

    // No change list: the engine never diffs on its own.
    engine
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketUpdated)
        .await;
    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, TicketPriority::Normal);

    let snapshot = ticket
        .snapshot()
        .unwrap()
        .with_changed_fields(vec!["status".to_string()]);
    engine.run(&snapshot, TriggerType::TicketUpdated).await;
    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.priority, TicketPriority::High);

    teardown_test_db(pool).await;
}

// ---------------------------------------------------------------------------
// Fail-isolation with instrumented ports
// ---------------------------------------------------------------------------

struct FailingWorkflows;

#[async_trait]
impl WorkflowRepository for FailingWorkflows {
    async fn create(&self, _workflow: &deskflow::Workflow) -> DomainResult<()> {
        Err(DomainError::DatabaseError("down".into()))
    }
    async fn get(&self, _id: Uuid) -> DomainResult<Option<deskflow::Workflow>> {
        Err(DomainError::DatabaseError("down".into()))
    }
    async fn list(&self) -> DomainResult<Vec<deskflow::Workflow>> {
        Err(DomainError::DatabaseError("down".into()))
    }
    async fn list_active_by_trigger(
        &self,
        _trigger: TriggerType,
    ) -> DomainResult<Vec<deskflow::Workflow>> {
        Err(DomainError::DatabaseError("down".into()))
    }
    async fn set_active(&self, _id: Uuid, _is_active: bool) -> DomainResult<()> {
        Err(DomainError::DatabaseError("down".into()))
    }
    async fn delete(&self, _id: Uuid) -> DomainResult<()> {
        Err(DomainError::DatabaseError("down".into()))
    }
}

#[derive(Default)]
struct RecordingTickets {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingTickets {
    fn record(&self, call: String) -> DomainResult<()> {
        let failing = self.fail_on.as_deref() == Some(call.as_str());
        self.calls.lock().unwrap().push(call);
        if failing {
            return Err(DomainError::DatabaseError("simulated write failure".into()));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketRepository for RecordingTickets {
    async fn create(&self, _ticket: &Ticket) -> DomainResult<()> {
        Ok(())
    }
    async fn get(&self, _id: Uuid) -> DomainResult<Option<Ticket>> {
        Ok(None)
    }
    async fn get_by_number(&self, _ticket_number: &str) -> DomainResult<Option<Ticket>> {
        Ok(None)
    }
    async fn assign(&self, _ticket_id: Uuid, agent_id: Uuid) -> DomainResult<()> {
        self.record(format!("assign:{agent_id}"))
    }
    async fn set_status(&self, _ticket_id: Uuid, status: TicketStatus) -> DomainResult<()> {
        self.record(format!("status:{}", status.as_str()))
    }
    async fn set_priority(&self, _ticket_id: Uuid, priority: TicketPriority) -> DomainResult<()> {
        self.record(format!("priority:{}", priority.as_str()))
    }
    async fn update_field(&self, _ticket_id: Uuid, field: &str, _value: &Value) -> DomainResult<()> {
        self.record(format!("field:{field}"))
    }
    async fn list_assigned_to(&self, _agent_id: Uuid) -> DomainResult<Vec<Ticket>> {
        Ok(Vec::new())
    }
}

struct NullNotifications;

#[async_trait]
impl NotificationRepository for NullNotifications {
    async fn create(&self, _notification: &deskflow::Notification) -> DomainResult<()> {
        Ok(())
    }
    async fn list_for_user(&self, _user_id: Uuid) -> DomainResult<Vec<deskflow::Notification>> {
        Ok(Vec::new())
    }
    async fn mark_read(&self, _id: Uuid) -> DomainResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn run_never_fails_even_when_the_workflow_store_is_down() {
    let engine = AutomationEngine::new(
        Arc::new(FailingWorkflows),
        Arc::new(RecordingTickets::default()),
        Arc::new(NullNotifications),
    );

    let ticket = Ticket::new("TCK-8", "Automation must stay silent");
    // The calling mutation flow completes; run just returns.
    engine
        .run(&ticket.snapshot().unwrap(), TriggerType::TicketCreated)
        .await;
}

#[tokio::test]
async fn actions_execute_in_presorted_order_and_survive_one_failure() {
    let tickets = Arc::new(RecordingTickets {
        calls: Mutex::new(Vec::new()),
        fail_on: Some("status:pending".to_string()),
    });

    // Stored out of order on purpose; the repository contract pre-sorts
    // and the executor must preserve whatever order it receives.
    let mut actions = vec![
        WorkflowAction::new(2, "UPDATE_STATUS", r#"{"status": "pending"}"#),
        WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "low"}"#),
        WorkflowAction::new(3, "UPDATE_FIELD", r#"{"field": "category", "value": "billing"}"#),
    ];
    actions.sort_by_key(|a| a.order);

    let engine = AutomationEngine::new(
        Arc::new(FailingWorkflows),
        tickets.clone(),
        Arc::new(NullNotifications),
    );

    let ticket = Ticket::new("TCK-9", "Ordering matters");
    engine
        .execute_actions(&ticket.snapshot().unwrap(), &actions, Uuid::new_v4())
        .await;

    // order 1 ran first, order 2 failed, order 3 still ran.
    assert_eq!(
        tickets.calls(),
        vec!["priority:low", "status:pending", "field:category"]
    );
}
