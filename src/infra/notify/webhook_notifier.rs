use crate::domain::ports::{Notifier, Severity};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Posts report summaries to a chat webhook. Best-effort only: callers
/// swallow errors, and an unconfigured URL makes every send a no-op.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str, severity: Severity) -> Result<(), AppError> {
        let Some(url) = self.webhook_url.as_deref() else {
            debug!("Notification channel not configured; dropping message");
            return Ok(());
        };

        let payload = json!({
            "text": message,
            "severity": severity.as_str(),
        });

        let res = self.client.post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Webhook connection error: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::Notification(format!(
                "Webhook returned status {}",
                res.status()
            )));
        }

        Ok(())
    }
}
