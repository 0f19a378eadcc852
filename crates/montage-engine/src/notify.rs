//! Completion notification to the upstream service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use montage_common::config::MontageConfig;
use montage_common::error::{MontageError, MontageResult};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Path appended to the configured base URL.
pub const NOTIFY_PATH: &str = "/videos/montage-service/video-completed-notify-user";

/// Body of the completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Artifact file name, without its directory.
    pub filename: String,

    /// Requesting user, forwarded exactly as received.
    pub user: serde_json::Value,
}

/// Delivers completion notifications.
pub trait Notifier: Send + Sync + 'static {
    /// Send `payload` authorised by `token`; resolves to the response body.
    fn notify(
        &self,
        payload: &NotificationPayload,
        token: &str,
    ) -> impl Future<Output = MontageResult<serde_json::Value>> + Send;
}

/// JSON-over-HTTP notifier with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(base_url: &str, timeout: Duration) -> MontageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MontageError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: notify_endpoint(base_url),
        })
    }

    pub fn from_config(config: &MontageConfig) -> MontageResult<Self> {
        Self::new(
            &config.notify_base_url,
            Duration::from_secs(config.notify_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Notifier for HttpNotifier {
    async fn notify(
        &self,
        payload: &NotificationPayload,
        token: &str,
    ) -> MontageResult<serde_json::Value> {
        tracing::info!(
            endpoint = %self.endpoint,
            filename = %payload.filename,
            "Sending completion notification"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| MontageError::notification(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MontageError::notification(format!("Failed reading response: {e}")))?;

        if !status.is_success() {
            return Err(MontageError::notification(format!(
                "Service responded {status}: {}",
                body.trim()
            )));
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

/// `{base}/videos/montage-service/video-completed-notify-user`.
pub fn notify_endpoint(base_url: &str) -> String {
    format!("{}{NOTIFY_PATH}", base_url.trim_end_matches('/'))
}

/// Fire the notification on its own task. The outcome is only logged.
pub fn spawn_notification<N: Notifier>(
    notifier: Arc<N>,
    payload: NotificationPayload,
    token: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.notify(&payload, &token).await {
            Ok(response) => {
                tracing::info!(filename = %payload.filename, response = %response, "Notification delivered");
            }
            Err(err) => {
                tracing::warn!(filename = %payload.filename, error = %err, "Notification failed");
            }
        }
    })
}

/// Give an in-flight notification up to `limit` to settle before exit.
pub async fn await_notification(handle: JoinHandle<()>, limit: Duration) {
    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!(error = %err, "Notification task aborted"),
        Err(_) => tracing::warn!(limit_secs = limit.as_secs_f64(), "Notification still pending at exit"),
    }
}
