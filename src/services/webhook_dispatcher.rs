//! Webhook delivery with an exponential-backoff retry policy.
//!
//! Delivery is fire-and-forget to the caller, like the automation engine:
//! endpoint failures are retried, then logged and dropped. Endpoints are
//! delivered to concurrently and isolated from each other, so one slow or
//! broken receiver never affects the rest.

use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoff;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::WebhookConfig;
use crate::domain::models::webhook::{WebhookEndpoint, WebhookEvent};
use crate::domain::ports::WebhookEndpointRepository;

/// Delivers event envelopes to subscribed endpoints.
pub struct WebhookDispatcher {
    endpoints: Arc<dyn WebhookEndpointRepository>,
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookDispatcher {
    pub fn new(
        endpoints: Arc<dyn WebhookEndpointRepository>,
        config: WebhookConfig,
    ) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DomainError::WebhookDeliveryFailed(e.to_string()))?;

        Ok(Self {
            endpoints,
            client,
            config,
        })
    }

    /// Deliver an event to every active endpoint subscribed to it.
    ///
    /// Never fails: lookup errors and per-endpoint delivery failures are
    /// logged and swallowed.
    pub async fn dispatch(&self, event: &WebhookEvent) {
        let endpoints = match self.endpoints.list_active_for_event(&event.event).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(event = %event.event, error = %e, "webhook endpoint lookup failed");
                return;
            }
        };

        if endpoints.is_empty() {
            debug!(event = %event.event, "no webhook endpoints subscribed");
            return;
        }

        let deliveries = endpoints.iter().map(|endpoint| self.deliver(endpoint, event));
        futures::future::join_all(deliveries).await;
    }

    /// Deliver to one endpoint, retrying transient failures.
    ///
    /// 5xx responses and transport errors are retried under the
    /// exponential-backoff policy; 4xx responses are permanent and fail
    /// immediately.
    async fn deliver(&self, endpoint: &WebhookEndpoint, event: &WebhookEvent) {
        let policy = ExponentialBackoff {
            initial_interval: Duration::from_millis(self.config.initial_backoff_ms),
            max_interval: Duration::from_millis(self.config.max_backoff_ms),
            max_elapsed_time: Some(Duration::from_millis(self.config.max_elapsed_ms)),
            ..ExponentialBackoff::default()
        };

        let result = backoff::future::retry(policy, || async {
            self.send_once(endpoint, event).await
        })
        .await;

        match result {
            Ok(()) => {
                info!(
                    event = %event.event,
                    endpoint = %endpoint.url,
                    ticket = %event.ticket_number,
                    "webhook delivered"
                );
            }
            Err(e) => {
                warn!(
                    event = %event.event,
                    endpoint = %endpoint.url,
                    ticket = %event.ticket_number,
                    error = %e,
                    "webhook delivery failed, giving up"
                );
            }
        }
    }

    async fn send_once(
        &self,
        endpoint: &WebhookEndpoint,
        event: &WebhookEvent,
    ) -> Result<(), backoff::Error<DomainError>> {
        let response = self
            .client
            .post(&endpoint.url)
            .header("x-deskflow-token", &endpoint.secret)
            .json(event)
            .send()
            .await
            .map_err(|e| {
                backoff::Error::transient(DomainError::WebhookDeliveryFailed(e.to_string()))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let err = DomainError::WebhookDeliveryFailed(format!(
            "{} responded {}",
            endpoint.url, status
        ));
        if status.is_server_error() {
            Err(backoff::Error::transient(err))
        } else {
            Err(backoff::Error::permanent(err))
        }
    }
}
