//! SQLite implementation of the SlaPolicyRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::sla::SlaPolicy;
use crate::domain::models::ticket::TicketPriority;
use crate::domain::ports::SlaPolicyRepository;

#[derive(Clone)]
pub struct SqliteSlaPolicyRepository {
    pool: SqlitePool,
}

impl SqliteSlaPolicyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SlaPolicyRow {
    id: String,
    name: String,
    priority: String,
    first_response_hours: i64,
    resolution_hours: i64,
    is_active: i32,
    created_at: String,
}

fn row_to_policy(row: SlaPolicyRow) -> DomainResult<SlaPolicy> {
    let priority = TicketPriority::from_str(&row.priority).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown policy priority: {}", row.priority))
    })?;

    Ok(SlaPolicy {
        id: parse_uuid(&row.id)?,
        name: row.name,
        priority,
        first_response_hours: row.first_response_hours,
        resolution_hours: row.resolution_hours,
        is_active: row.is_active != 0,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl SlaPolicyRepository for SqliteSlaPolicyRepository {
    async fn create(&self, policy: &SlaPolicy) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO sla_policies
             (id, name, priority, first_response_hours, resolution_hours, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(policy.id.to_string())
        .bind(&policy.name)
        .bind(policy.priority.as_str())
        .bind(policy.first_response_hours)
        .bind(policy.resolution_hours)
        .bind(i32::from(policy.is_active))
        .bind(policy.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_active_for_priority(
        &self,
        priority: TicketPriority,
    ) -> DomainResult<Option<SlaPolicy>> {
        let row: Option<SlaPolicyRow> = sqlx::query_as(
            "SELECT * FROM sla_policies
             WHERE priority = ? AND is_active = 1
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(priority.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_policy).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<SlaPolicy>> {
        let rows: Vec<SlaPolicyRow> =
            sqlx::query_as("SELECT * FROM sla_policies ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(row_to_policy).collect()
    }
}
