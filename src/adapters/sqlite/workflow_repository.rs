//! SQLite implementation of the WorkflowRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::workflow::{Condition, TriggerType, Workflow, WorkflowAction};
use crate::domain::ports::WorkflowRepository;

#[derive(Clone)]
pub struct SqliteWorkflowRepository {
    pool: SqlitePool,
}

impl SqliteWorkflowRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_children(&self, workflow: &mut Workflow) -> DomainResult<()> {
        let condition_rows: Vec<ConditionRow> = sqlx::query_as(
            "SELECT * FROM workflow_conditions WHERE workflow_id = ? ORDER BY id",
        )
        .bind(workflow.id.to_string())
        .fetch_all(&self.pool)
        .await?;
        workflow.conditions = condition_rows
            .into_iter()
            .map(row_to_condition)
            .collect::<DomainResult<_>>()?;

        // Actions come back pre-sorted; the executor relies on this order.
        let action_rows: Vec<ActionRow> = sqlx::query_as(
            "SELECT * FROM workflow_actions WHERE workflow_id = ? ORDER BY sort_order ASC",
        )
        .bind(workflow.id.to_string())
        .fetch_all(&self.pool)
        .await?;
        workflow.actions = action_rows
            .into_iter()
            .map(row_to_action)
            .collect::<DomainResult<_>>()?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkflowRow {
    id: String,
    name: String,
    description: String,
    trigger: String,
    is_active: i32,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ConditionRow {
    id: String,
    workflow_id: String,
    field: String,
    operator: String,
    value: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ActionRow {
    id: String,
    workflow_id: String,
    sort_order: i64,
    action_type: String,
    payload: String,
}

fn row_to_workflow(row: WorkflowRow) -> DomainResult<Workflow> {
    let trigger = TriggerType::from_str(&row.trigger).ok_or_else(|| {
        DomainError::SerializationError(format!("Unknown trigger type: {}", row.trigger))
    })?;

    Ok(Workflow {
        id: parse_uuid(&row.id)?,
        name: row.name,
        description: row.description,
        trigger,
        is_active: row.is_active != 0,
        conditions: Vec::new(),
        actions: Vec::new(),
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

fn row_to_condition(row: ConditionRow) -> DomainResult<Condition> {
    Ok(Condition {
        id: parse_uuid(&row.id)?,
        workflow_id: parse_uuid(&row.workflow_id)?,
        field: row.field,
        operator: row.operator,
        value: row.value,
    })
}

fn row_to_action(row: ActionRow) -> DomainResult<WorkflowAction> {
    Ok(WorkflowAction {
        id: parse_uuid(&row.id)?,
        workflow_id: parse_uuid(&row.workflow_id)?,
        order: row.sort_order,
        action_type: row.action_type,
        payload: row.payload,
    })
}

#[async_trait]
impl WorkflowRepository for SqliteWorkflowRepository {
    async fn create(&self, workflow: &Workflow) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO workflows (id, name, description, trigger, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(workflow.id.to_string())
        .bind(&workflow.name)
        .bind(&workflow.description)
        .bind(workflow.trigger.as_str())
        .bind(i32::from(workflow.is_active))
        .bind(workflow.created_at.to_rfc3339())
        .bind(workflow.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for condition in &workflow.conditions {
            sqlx::query(
                "INSERT INTO workflow_conditions (id, workflow_id, field, operator, value)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(condition.id.to_string())
            .bind(workflow.id.to_string())
            .bind(&condition.field)
            .bind(&condition.operator)
            .bind(&condition.value)
            .execute(&mut *tx)
            .await?;
        }

        for action in &workflow.actions {
            sqlx::query(
                "INSERT INTO workflow_actions (id, workflow_id, sort_order, action_type, payload)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(action.id.to_string())
            .bind(workflow.id.to_string())
            .bind(action.order)
            .bind(&action.action_type)
            .bind(&action.payload)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Workflow>> {
        let row: Option<WorkflowRow> = sqlx::query_as("SELECT * FROM workflows WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else { return Ok(None) };
        let mut workflow = row_to_workflow(row)?;
        self.load_children(&mut workflow).await?;
        Ok(Some(workflow))
    }

    async fn list(&self) -> DomainResult<Vec<Workflow>> {
        let rows: Vec<WorkflowRow> =
            sqlx::query_as("SELECT * FROM workflows ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;

        let mut workflows = Vec::with_capacity(rows.len());
        for row in rows {
            let mut workflow = row_to_workflow(row)?;
            self.load_children(&mut workflow).await?;
            workflows.push(workflow);
        }
        Ok(workflows)
    }

    async fn list_active_by_trigger(&self, trigger: TriggerType) -> DomainResult<Vec<Workflow>> {
        let rows: Vec<WorkflowRow> = sqlx::query_as(
            "SELECT * FROM workflows WHERE trigger = ? AND is_active = 1 ORDER BY created_at ASC",
        )
        .bind(trigger.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut workflows = Vec::with_capacity(rows.len());
        for row in rows {
            let mut workflow = row_to_workflow(row)?;
            self.load_children(&mut workflow).await?;
            workflows.push(workflow);
        }
        Ok(workflows)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> DomainResult<()> {
        let result = sqlx::query("UPDATE workflows SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(i32::from(is_active))
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::WorkflowNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM workflows WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
