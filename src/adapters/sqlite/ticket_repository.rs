//! SQLite implementation of the TicketRepository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_optional_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ticket::{Ticket, TicketPriority, TicketStatus};
use crate::domain::ports::TicketRepository;

/// Ticket columns writable through the generic `UPDATE_FIELD` action.
/// Everything else goes through a typed mutation.
const UPDATABLE_FIELDS: &[&str] = &[
    "subject",
    "category",
    "status",
    "priority",
    "unassigned_reason",
];

#[derive(Clone)]
pub struct SqliteTicketRepository {
    pool: SqlitePool,
}

impl SqliteTicketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn touch_and_set(&self, ticket_id: Uuid, column: &str, value: String) -> DomainResult<()> {
        // Column names are restricted to the fixed vocabulary above or to
        // the typed mutations below; never caller-supplied directly.
        let sql = format!("UPDATE tickets SET {column} = ?, updated_at = ? WHERE id = ?");
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(ticket_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TicketNotFound(ticket_id));
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: String,
    ticket_number: String,
    subject: String,
    description: Option<String>,
    status: String,
    priority: String,
    category: Option<String>,
    tags: String,
    requester_name: Option<String>,
    requester_email: Option<String>,
    assignee_id: Option<String>,
    previous_owner_id: Option<String>,
    is_claimable: i32,
    unassigned_reason: Option<String>,
    first_response_at: Option<String>,
    resolved_at: Option<String>,
    created_at: String,
    updated_at: String,
}

fn row_to_ticket(row: TicketRow) -> DomainResult<Ticket> {
    let status = TicketStatus::from_str(&row.status).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown ticket status: {}", row.status))
    })?;
    let priority = TicketPriority::from_str(&row.priority).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown ticket priority: {}", row.priority))
    })?;
    let tags: Vec<String> = serde_json::from_str(&row.tags)?;

    Ok(Ticket {
        id: parse_uuid(&row.id)?,
        ticket_number: row.ticket_number,
        subject: row.subject,
        description: row.description,
        status,
        priority,
        category: row.category,
        tags,
        requester_name: row.requester_name,
        requester_email: row.requester_email,
        assignee_id: parse_optional_uuid(row.assignee_id)?,
        previous_owner_id: parse_optional_uuid(row.previous_owner_id)?,
        is_claimable: row.is_claimable != 0,
        unassigned_reason: row.unassigned_reason,
        first_response_at: parse_optional_datetime(row.first_response_at)?,
        resolved_at: parse_optional_datetime(row.resolved_at)?,
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

#[async_trait]
impl TicketRepository for SqliteTicketRepository {
    async fn create(&self, ticket: &Ticket) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO tickets
             (id, ticket_number, subject, description, status, priority, category, tags,
              requester_name, requester_email, assignee_id, previous_owner_id, is_claimable,
              unassigned_reason, first_response_at, resolved_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(ticket.id.to_string())
        .bind(&ticket.ticket_number)
        .bind(&ticket.subject)
        .bind(&ticket.description)
        .bind(ticket.status.as_str())
        .bind(ticket.priority.as_str())
        .bind(&ticket.category)
        .bind(serde_json::to_string(&ticket.tags)?)
        .bind(&ticket.requester_name)
        .bind(&ticket.requester_email)
        .bind(ticket.assignee_id.map(|id| id.to_string()))
        .bind(ticket.previous_owner_id.map(|id| id.to_string()))
        .bind(i32::from(ticket.is_claimable))
        .bind(&ticket.unassigned_reason)
        .bind(ticket.first_response_at.map(|t| t.to_rfc3339()))
        .bind(ticket.resolved_at.map(|t| t.to_rfc3339()))
        .bind(ticket.created_at.to_rfc3339())
        .bind(ticket.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Ticket>> {
        let row: Option<TicketRow> = sqlx::query_as("SELECT * FROM tickets WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_ticket).transpose()
    }

    async fn get_by_number(&self, ticket_number: &str) -> DomainResult<Option<Ticket>> {
        let row: Option<TicketRow> =
            sqlx::query_as("SELECT * FROM tickets WHERE ticket_number = ?")
                .bind(ticket_number)
                .fetch_optional(&self.pool)
                .await?;
        row.map(row_to_ticket).transpose()
    }

    async fn assign(&self, ticket_id: Uuid, agent_id: Uuid) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE tickets
             SET assignee_id = ?, is_claimable = 0, unassigned_reason = NULL, updated_at = ?
             WHERE id = ?",
        )
        .bind(agent_id.to_string())
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(ticket_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TicketNotFound(ticket_id));
        }
        Ok(())
    }

    async fn set_status(&self, ticket_id: Uuid, status: TicketStatus) -> DomainResult<()> {
        self.touch_and_set(ticket_id, "status", status.as_str().to_string())
            .await
    }

    async fn set_priority(&self, ticket_id: Uuid, priority: TicketPriority) -> DomainResult<()> {
        self.touch_and_set(ticket_id, "priority", priority.as_str().to_string())
            .await
    }

    async fn update_field(&self, ticket_id: Uuid, field: &str, value: &Value) -> DomainResult<()> {
        if !UPDATABLE_FIELDS.contains(&field) {
            return Err(DomainError::ValidationFailed(format!(
                "field '{field}' is not updatable"
            )));
        }

        // Enum-backed columns still get validated before the write.
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(DomainError::ValidationFailed(format!(
                    "unsupported value for field '{field}': {other}"
                )))
            }
        };
        if field == "status" && TicketStatus::from_str(&text).is_none() {
            return Err(DomainError::ValidationFailed(format!("invalid status: {text}")));
        }
        if field == "priority" && TicketPriority::from_str(&text).is_none() {
            return Err(DomainError::ValidationFailed(format!("invalid priority: {text}")));
        }

        self.touch_and_set(ticket_id, field, text).await
    }

    async fn list_assigned_to(&self, agent_id: Uuid) -> DomainResult<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            "SELECT * FROM tickets WHERE assignee_id = ? ORDER BY created_at ASC",
        )
        .bind(agent_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_ticket).collect()
    }
}
