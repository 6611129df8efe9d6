use std::time::{Duration, Instant};

use crate::domain::models::ticket::TicketQuery;
use crate::domain::ports::{TicketApi, UpstreamResponse};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::error;

/// Thin HTTP client for the per-company helpdesk API. Reports the raw
/// status, body, and call duration; deciding what a non-2xx status means
/// is the pipeline's job. There is no retry: a failed fetch fails the
/// request it belongs to.
pub struct HttpTicketApi {
    client: Client,
}

impl HttpTicketApi {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl TicketApi for HttpTicketApi {
    async fn fetch(&self, api_url: &str, payload: &TicketQuery) -> Result<UpstreamResponse, AppError> {
        let started = Instant::now();

        let response = self.client.post(api_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Upstream connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(UpstreamResponse {
            status,
            body,
            duration_ms: started.elapsed().as_millis() as i64,
        })
    }
}
