mod helpers;

use uuid::Uuid;

use deskflow::adapters::sqlite::SqliteWorkflowRepository;
use deskflow::domain::models::{Condition, TriggerType, Workflow, WorkflowAction};
use deskflow::domain::ports::WorkflowRepository;

use helpers::database::{setup_test_db, teardown_test_db};

#[tokio::test]
async fn create_and_get_round_trips_conditions_and_actions() {
    let pool = setup_test_db().await;
    let repo = SqliteWorkflowRepository::new(pool.clone());

    let workflow = Workflow::new("vip-escalation", TriggerType::TicketCreated)
        .with_description("Escalate anything from VIP requesters")
        .with_condition(Condition::new("requesterEmail", "contains", Some("@bigcorp.com".into())))
        .with_condition(Condition::new("priority", "in", Some("high, urgent".into())))
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "urgent"}"#))
        .with_action(WorkflowAction::new(2, "UPDATE_STATUS", r#"{"status": "in_progress"}"#));
    repo.create(&workflow).await.expect("create workflow");

    let stored = repo.get(workflow.id).await.unwrap().expect("workflow exists");
    assert_eq!(stored.name, "vip-escalation");
    assert_eq!(stored.trigger, TriggerType::TicketCreated);
    assert!(stored.is_active);
    assert_eq!(stored.conditions.len(), 2);
    assert_eq!(stored.conditions[0].field, "requesterEmail");
    assert_eq!(stored.actions.len(), 2);
    assert_eq!(stored.actions[0].order, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn get_nonexistent_workflow_is_none() {
    let pool = setup_test_db().await;
    let repo = SqliteWorkflowRepository::new(pool.clone());
    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    teardown_test_db(pool).await;
}

#[tokio::test]
async fn actions_come_back_sorted_by_order_regardless_of_insert_order() {
    let pool = setup_test_db().await;
    let repo = SqliteWorkflowRepository::new(pool.clone());

    // Inserted as 2, 1, 3; stored order must not leak into reads.
    let workflow = Workflow::new("scrambled", TriggerType::TicketUpdated)
        .with_action(WorkflowAction::new(2, "UPDATE_STATUS", r#"{"status": "pending"}"#))
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "low"}"#))
        .with_action(WorkflowAction::new(3, "UPDATE_FIELD", r#"{"field": "category", "value": "x"}"#));
    repo.create(&workflow).await.expect("create workflow");

    let stored = repo.get(workflow.id).await.unwrap().unwrap();
    let orders: Vec<i64> = stored.actions.iter().map(|a| a.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn list_active_by_trigger_filters_and_preserves_creation_order() {
    let pool = setup_test_db().await;
    let repo = SqliteWorkflowRepository::new(pool.clone());

    let first = Workflow::new("first", TriggerType::TicketCreated);
    repo.create(&first).await.unwrap();

    let mut second = Workflow::new("second", TriggerType::TicketCreated);
    second.created_at = first.created_at + chrono::Duration::seconds(1);
    second.updated_at = second.created_at;
    repo.create(&second).await.unwrap();

    let mut inactive = Workflow::new("inactive", TriggerType::TicketCreated).disabled();
    inactive.created_at = first.created_at + chrono::Duration::seconds(2);
    repo.create(&inactive).await.unwrap();

    let other_trigger = Workflow::new("other", TriggerType::TicketAssigned);
    repo.create(&other_trigger).await.unwrap();

    let listed = repo
        .list_active_by_trigger(TriggerType::TicketCreated)
        .await
        .unwrap();
    let names: Vec<&str> = listed.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);

    // The unfiltered listing still sees all four.
    assert_eq!(repo.list().await.unwrap().len(), 4);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn set_active_toggles_and_delete_cascades() {
    let pool = setup_test_db().await;
    let repo = SqliteWorkflowRepository::new(pool.clone());

    let workflow = Workflow::new("toggle-me", TriggerType::SlaBreached)
        .with_condition(Condition::new("priority", "equals", Some("urgent".into())))
        .with_action(WorkflowAction::new(1, "SET_PRIORITY", r#"{"priority": "urgent"}"#));
    repo.create(&workflow).await.unwrap();

    repo.set_active(workflow.id, false).await.unwrap();
    let stored = repo.get(workflow.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert!(repo
        .list_active_by_trigger(TriggerType::SlaBreached)
        .await
        .unwrap()
        .is_empty());

    repo.delete(workflow.id).await.unwrap();
    assert!(repo.get(workflow.id).await.unwrap().is_none());

    let (orphans,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM workflow_conditions WHERE workflow_id = ?")
            .bind(workflow.id.to_string())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn set_active_on_missing_workflow_errors() {
    let pool = setup_test_db().await;
    let repo = SqliteWorkflowRepository::new(pool.clone());
    assert!(repo.set_active(Uuid::new_v4(), true).await.is_err());
    teardown_test_db(pool).await;
}
