mod helpers;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use deskflow::adapters::sqlite::SqliteTicketRepository;
use deskflow::domain::errors::DomainError;
use deskflow::domain::models::{Agent, AgentStatus, LeaveStatus, Ticket, TicketStatus};
use deskflow::domain::ports::TicketRepository;
use deskflow::services::LeaveService;

use helpers::database::{setup_test_db, teardown_test_db};

async fn insert_agent(pool: &SqlitePool, agent: &Agent) {
    sqlx::query(
        "INSERT INTO agents (id, name, email, status, leave_from, leave_to, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(agent.id.to_string())
    .bind(&agent.name)
    .bind(&agent.email)
    .bind(agent.status.as_str())
    .bind(agent.leave_from.map(|t| t.to_rfc3339()))
    .bind(agent.leave_to.map(|t| t.to_rfc3339()))
    .bind(agent.created_at.to_rfc3339())
    .bind(agent.updated_at.to_rfc3339())
    .execute(pool)
    .await
    .expect("insert agent");
}

async fn insert_assigned_ticket(
    pool: &SqlitePool,
    number: &str,
    agent_id: Uuid,
    status: TicketStatus,
) -> Ticket {
    let tickets = SqliteTicketRepository::new(pool.clone());
    let mut ticket = Ticket::new(number, format!("Ticket {number}"));
    ticket.status = status;
    ticket.assignee_id = Some(agent_id);
    tickets.create(&ticket).await.expect("create ticket");
    ticket
}

#[tokio::test]
async fn on_leave_unassigns_only_non_terminal_tickets() {
    let pool = setup_test_db().await;
    let agent = Agent::new("Priya", "priya@example.com");
    insert_agent(&pool, &agent).await;

    insert_assigned_ticket(&pool, "TCK-10", agent.id, TicketStatus::Open).await;
    insert_assigned_ticket(&pool, "TCK-11", agent.id, TicketStatus::Pending).await;
    let resolved = insert_assigned_ticket(&pool, "TCK-12", agent.id, TicketStatus::Resolved).await;

    let service = LeaveService::new(pool.clone());
    let outcome = service
        .set_agent_on_leave(agent.id, Utc::now(), Some(Utc::now() + Duration::days(5)))
        .await
        .expect("set on leave");

    assert_eq!(outcome.unassigned_tickets, 2);
    assert_eq!(outcome.agent.status, AgentStatus::OnLeave);
    assert!(outcome.agent.leave_from.is_some());

    let tickets = SqliteTicketRepository::new(pool.clone());
    let open = tickets.get_by_number("TCK-10").await.unwrap().unwrap();
    assert_eq!(open.assignee_id, None);
    assert_eq!(open.previous_owner_id, Some(agent.id));
    assert!(open.is_claimable);
    assert_eq!(open.unassigned_reason.as_deref(), Some("leave"));

    let untouched = tickets.get(resolved.id).await.unwrap().unwrap();
    assert_eq!(untouched.assignee_id, Some(agent.id));
    assert!(!untouched.is_claimable);

    // Only the resolved ticket still hangs off the agent.
    let still_assigned = tickets.list_assigned_to(agent.id).await.unwrap();
    assert_eq!(still_assigned.len(), 1);
    assert_eq!(still_assigned[0].ticket_number, "TCK-12");

    // One activity row per unassigned ticket.
    let (activity_rows,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM activity_log WHERE activity_type = 'unassigned'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(activity_rows, 2);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn leave_then_return_closes_exactly_one_history_row() {
    let pool = setup_test_db().await;
    let agent = Agent::new("Marco", "marco@example.com");
    insert_agent(&pool, &agent).await;

    let service = LeaveService::new(pool.clone());
    service
        .set_agent_on_leave(agent.id, Utc::now(), None)
        .await
        .expect("set on leave");

    let status = service.leave_status(agent.id).await.expect("leave status");
    assert_eq!(status.agent.status, AgentStatus::OnLeave);
    let open = status.open_leave.expect("open leave row");
    assert_eq!(open.status, LeaveStatus::OnLeave);
    assert!(open.end_date.is_none());

    let returned = service.set_agent_active(agent.id).await.expect("set active");
    assert_eq!(returned.status, AgentStatus::Active);
    assert!(returned.leave_from.is_none());

    #[derive(sqlx::FromRow)]
    struct HistoryRow {
        end_date: Option<String>,
        status: String,
    }
    let rows: Vec<HistoryRow> =
        sqlx::query_as("SELECT end_date, status FROM leave_history WHERE agent_id = ?")
            .bind(agent.id.to_string())
            .fetch_all(&pool)
            .await
            .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "returned");
    assert!(rows[0].end_date.is_some());

    let status = service.leave_status(agent.id).await.expect("leave status");
    assert!(status.open_leave.is_none());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn double_on_leave_fails_without_corrupting_state() {
    let pool = setup_test_db().await;
    let agent = Agent::new("Sam", "sam@example.com");
    insert_agent(&pool, &agent).await;
    insert_assigned_ticket(&pool, "TCK-13", agent.id, TicketStatus::Open).await;

    let service = LeaveService::new(pool.clone());
    service
        .set_agent_on_leave(agent.id, Utc::now(), None)
        .await
        .expect("first on-leave");

    let err = service
        .set_agent_on_leave(agent.id, Utc::now(), None)
        .await
        .expect_err("second on-leave must fail");
    assert!(matches!(err, DomainError::AgentAlreadyOnLeave(_)));

    // Invariant holds: exactly one open history row, no tickets assigned.
    let (open_rows,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM leave_history WHERE agent_id = ? AND end_date IS NULL",
    )
    .bind(agent.id.to_string())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(open_rows, 1);

    let status = service.leave_status(agent.id).await.expect("leave status");
    assert_eq!(status.agent.status, AgentStatus::OnLeave);
    assert_eq!(status.assigned_tickets, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn operations_on_unknown_agents_fail_cleanly() {
    let pool = setup_test_db().await;
    let service = LeaveService::new(pool.clone());
    let ghost = Uuid::new_v4();

    assert!(matches!(
        service.set_agent_on_leave(ghost, Utc::now(), None).await,
        Err(DomainError::AgentNotFound(_))
    ));
    assert!(matches!(
        service.set_agent_active(ghost).await,
        Err(DomainError::AgentNotFound(_))
    ));
    assert!(matches!(
        service.leave_status(ghost).await,
        Err(DomainError::AgentNotFound(_))
    ));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn reassignment_after_return_is_possible() {
    let pool = setup_test_db().await;
    let agent = Agent::new("Lena", "lena@example.com");
    insert_agent(&pool, &agent).await;
    let ticket = insert_assigned_ticket(&pool, "TCK-14", agent.id, TicketStatus::Open).await;

    let service = LeaveService::new(pool.clone());
    service
        .set_agent_on_leave(agent.id, Utc::now(), None)
        .await
        .expect("on leave");
    service.set_agent_active(agent.id).await.expect("active");

    // The ticket stays unassigned until someone claims it.
    let tickets = SqliteTicketRepository::new(pool.clone());
    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.assignee_id, None);
    assert!(stored.is_claimable);

    tickets.assign(ticket.id, agent.id).await.expect("reassign");
    let stored = tickets.get(ticket.id).await.unwrap().unwrap();
    assert_eq!(stored.assignee_id, Some(agent.id));
    assert!(!stored.is_claimable);
    assert!(stored.unassigned_reason.is_none());

    teardown_test_db(pool).await;
}
