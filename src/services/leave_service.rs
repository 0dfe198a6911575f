//! Agent leave management and ticket reassignment.
//!
//! Each mutation runs in a single database transaction: either the agent's
//! status, the leave history, every ticket unassignment, and every
//! activity row all commit together, or none of them do. There is no state
//! where an agent is on leave but still holds tickets.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_optional_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::activity::ActivityLog;
use crate::domain::models::agent::{Agent, AgentStatus, LeaveHistory, LeaveStatus};

/// Reason recorded on tickets unassigned by a leave cascade.
const UNASSIGNED_REASON_LEAVE: &str = "leave";

/// Result of marking an agent on leave.
#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    /// The agent after the update.
    pub agent: Agent,
    /// How many tickets were unassigned by the cascade.
    pub unassigned_tickets: u64,
}

/// Read-only view of an agent's leave situation.
#[derive(Debug, Clone)]
pub struct AgentLeaveStatus {
    pub agent: Agent,
    /// The ongoing leave episode, if any.
    pub open_leave: Option<LeaveHistory>,
    /// Tickets currently assigned to the agent.
    pub assigned_tickets: u64,
}

/// Transactional leave/reassignment policy engine.
#[derive(Clone)]
pub struct LeaveService {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct AgentRow {
    id: String,
    name: String,
    email: String,
    status: String,
    leave_from: Option<String>,
    leave_to: Option<String>,
    created_at: String,
    updated_at: String,
}

fn row_to_agent(row: AgentRow) -> DomainResult<Agent> {
    Ok(Agent {
        id: parse_uuid(&row.id)?,
        name: row.name,
        email: row.email,
        status: AgentStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("bad agent status: {}", row.status)))?,
        leave_from: parse_optional_datetime(row.leave_from)?,
        leave_to: parse_optional_datetime(row.leave_to)?,
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

impl LeaveService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Mark an agent on leave and unassign their open tickets.
    ///
    /// Fails with `AgentAlreadyOnLeave` before any write if the agent is
    /// already on leave; this check runs inside the transaction and is
    /// what keeps at most one open leave-history row per agent.
    pub async fn set_agent_on_leave(
        &self,
        agent_id: Uuid,
        leave_from: DateTime<Utc>,
        leave_to: Option<DateTime<Utc>>,
    ) -> DomainResult<LeaveOutcome> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row: Option<AgentRow> = sqlx::query_as("SELECT * FROM agents WHERE id = ?")
            .bind(agent_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let mut agent = row
            .map(row_to_agent)
            .transpose()?
            .ok_or(DomainError::AgentNotFound(agent_id))?;

        if agent.status == AgentStatus::OnLeave {
            return Err(DomainError::AgentAlreadyOnLeave(agent_id));
        }

        sqlx::query(
            "UPDATE agents SET status = ?, leave_from = ?, leave_to = ?, updated_at = ? WHERE id = ?",
        )
        .bind(AgentStatus::OnLeave.as_str())
        .bind(leave_from.to_rfc3339())
        .bind(leave_to.map(|t| t.to_rfc3339()))
        .bind(now.to_rfc3339())
        .bind(agent_id.to_string())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO leave_history (id, agent_id, start_date, end_date, status)
             VALUES (?, ?, ?, NULL, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(agent_id.to_string())
        .bind(leave_from.to_rfc3339())
        .bind(LeaveStatus::OnLeave.as_str())
        .execute(&mut *tx)
        .await?;

        // Tickets in a terminal status stay with the agent.
        let ticket_ids: Vec<(String,)> = sqlx::query_as(
            "SELECT id FROM tickets
             WHERE assignee_id = ? AND status NOT IN ('resolved', 'closed')",
        )
        .bind(agent_id.to_string())
        .fetch_all(&mut *tx)
        .await?;

        for (ticket_id,) in &ticket_ids {
            sqlx::query(
                "UPDATE tickets
                 SET assignee_id = NULL, previous_owner_id = ?, is_claimable = 1,
                     unassigned_reason = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(agent_id.to_string())
            .bind(UNASSIGNED_REASON_LEAVE)
            .bind(now.to_rfc3339())
            .bind(ticket_id)
            .execute(&mut *tx)
            .await?;
        }

        for (ticket_id,) in &ticket_ids {
            let entry = ActivityLog::new(
                parse_uuid(ticket_id)?,
                "unassigned",
                "Agent marked on leave",
            );
            sqlx::query(
                "INSERT INTO activity_log (id, ticket_id, activity_type, detail, actor_id, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(entry.id.to_string())
            .bind(entry.ticket_id.to_string())
            .bind(&entry.activity_type)
            .bind(&entry.detail)
            .bind(Some(agent_id.to_string()))
            .bind(entry.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        agent.status = AgentStatus::OnLeave;
        agent.leave_from = Some(leave_from);
        agent.leave_to = leave_to;
        agent.updated_at = now;

        let unassigned = ticket_ids.len() as u64;
        info!(
            agent = %agent.name,
            agent_id = %agent_id,
            unassigned_tickets = unassigned,
            "agent marked on leave"
        );

        Ok(LeaveOutcome {
            agent,
            unassigned_tickets: unassigned,
        })
    }

    /// Mark an agent active again and close the open leave episode.
    pub async fn set_agent_active(&self, agent_id: Uuid) -> DomainResult<Agent> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row: Option<AgentRow> = sqlx::query_as("SELECT * FROM agents WHERE id = ?")
            .bind(agent_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let mut agent = row
            .map(row_to_agent)
            .transpose()?
            .ok_or(DomainError::AgentNotFound(agent_id))?;

        sqlx::query(
            "UPDATE agents SET status = ?, leave_from = NULL, leave_to = NULL, updated_at = ? WHERE id = ?",
        )
        .bind(AgentStatus::Active.as_str())
        .bind(now.to_rfc3339())
        .bind(agent_id.to_string())
        .execute(&mut *tx)
        .await?;

        // At most one open episode exists; close it.
        sqlx::query(
            "UPDATE leave_history SET end_date = ?, status = ?
             WHERE agent_id = ? AND status = ? AND end_date IS NULL",
        )
        .bind(now.to_rfc3339())
        .bind(LeaveStatus::Returned.as_str())
        .bind(agent_id.to_string())
        .bind(LeaveStatus::OnLeave.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        agent.status = AgentStatus::Active;
        agent.leave_from = None;
        agent.leave_to = None;
        agent.updated_at = now;

        info!(agent = %agent.name, agent_id = %agent_id, "agent returned from leave");
        Ok(agent)
    }

    /// Current leave situation for an agent. Pure read.
    pub async fn leave_status(&self, agent_id: Uuid) -> DomainResult<AgentLeaveStatus> {
        let row: Option<AgentRow> = sqlx::query_as("SELECT * FROM agents WHERE id = ?")
            .bind(agent_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        let agent = row
            .map(row_to_agent)
            .transpose()?
            .ok_or(DomainError::AgentNotFound(agent_id))?;

        #[derive(sqlx::FromRow)]
        struct LeaveRow {
            id: String,
            agent_id: String,
            start_date: String,
            end_date: Option<String>,
            status: String,
        }

        let open: Option<LeaveRow> = sqlx::query_as(
            "SELECT * FROM leave_history WHERE agent_id = ? AND end_date IS NULL",
        )
        .bind(agent_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let open_leave = open
            .map(|row| -> DomainResult<LeaveHistory> {
                Ok(LeaveHistory {
                    id: parse_uuid(&row.id)?,
                    agent_id: parse_uuid(&row.agent_id)?,
                    start_date: parse_datetime(&row.start_date)?,
                    end_date: parse_optional_datetime(row.end_date)?,
                    status: LeaveStatus::from_str(&row.status).ok_or_else(|| {
                        DomainError::SerializationError(format!("bad leave status: {}", row.status))
                    })?,
                })
            })
            .transpose()?;

        let (assigned_tickets,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE assignee_id = ?")
                .bind(agent_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(AgentLeaveStatus {
            agent,
            open_leave,
            assigned_tickets: assigned_tickets as u64,
        })
    }
}
