//! SQLite implementation of the WebhookEndpointRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::DomainResult;
use crate::domain::models::webhook::WebhookEndpoint;
use crate::domain::ports::WebhookEndpointRepository;

#[derive(Clone)]
pub struct SqliteWebhookEndpointRepository {
    pool: SqlitePool,
}

impl SqliteWebhookEndpointRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EndpointRow {
    id: String,
    url: String,
    secret: String,
    events: String,
    is_active: i32,
    created_at: String,
}

fn row_to_endpoint(row: EndpointRow) -> DomainResult<WebhookEndpoint> {
    let events: Vec<String> = serde_json::from_str(&row.events)?;
    Ok(WebhookEndpoint {
        id: parse_uuid(&row.id)?,
        url: row.url,
        secret: row.secret,
        events,
        is_active: row.is_active != 0,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl WebhookEndpointRepository for SqliteWebhookEndpointRepository {
    async fn create(&self, endpoint: &WebhookEndpoint) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO webhook_endpoints (id, url, secret, events, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(endpoint.id.to_string())
        .bind(&endpoint.url)
        .bind(&endpoint.secret)
        .bind(serde_json::to_string(&endpoint.events)?)
        .bind(i32::from(endpoint.is_active))
        .bind(endpoint.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_active_for_event(&self, event: &str) -> DomainResult<Vec<WebhookEndpoint>> {
        // Subscriptions live in a JSON column; filter after decoding.
        let rows: Vec<EndpointRow> =
            sqlx::query_as("SELECT * FROM webhook_endpoints WHERE is_active = 1")
                .fetch_all(&self.pool)
                .await?;

        let mut endpoints = Vec::new();
        for row in rows {
            let endpoint = row_to_endpoint(row)?;
            if endpoint.subscribes_to(event) {
                endpoints.push(endpoint);
            }
        }
        Ok(endpoints)
    }

    async fn list(&self) -> DomainResult<Vec<WebhookEndpoint>> {
        let rows: Vec<EndpointRow> =
            sqlx::query_as("SELECT * FROM webhook_endpoints ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(row_to_endpoint).collect()
    }
}
