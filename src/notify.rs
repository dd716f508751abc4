//! Webhook delivery for composed messages

use crate::errors::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Outcome of one delivery attempt. Delivery failure is reported here,
/// never as an error that could abort the run: losing one chat message
/// must not be mistaken for an actual outage.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub success: bool,
    pub destination: String,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl DeliveryResult {
    pub fn success(destination: impl Into<String>) -> Self {
        Self {
            success: true,
            destination: destination.into(),
            status_code: None,
            message: None,
        }
    }

    pub fn failure(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            destination: destination.into(),
            status_code: None,
            message: Some(message.into()),
        }
    }

    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }
}

/// A destination that accepts an opaque formatted message
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, destination: &str, text: &str) -> DeliveryResult;
}

/// Chat-webhook sink: one POST of `{"text": ...}` per message, bounded by
/// the client timeout, no retries.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("uptime_reporter/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn send(&self, destination: &str, text: &str) -> DeliveryResult {
        debug!("Posting {} characters to {}", text.len(), destination);

        let payload = serde_json::json!({ "text": text });

        match self.client.post(destination).json(&payload).send().await {
            Ok(response) => {
                let code = response.status().as_u16();

                if response.status().is_success() {
                    info!("Webhook {} accepted the message ({})", destination, code);
                    DeliveryResult::success(destination).with_status_code(code)
                } else {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "unreadable response body".to_string());
                    error!("Webhook {} rejected the message: {} {}", destination, code, body);
                    DeliveryResult::failure(destination, body).with_status_code(code)
                }
            }
            Err(e) => {
                error!("Webhook {} unreachable: {}", destination, e);
                DeliveryResult::failure(destination, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier() -> WebhookNotifier {
        WebhookNotifier::new(Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({ "text": "all good" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let result = notifier().send(&url, "all good").await;

        assert!(result.success);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.destination, url);
    }

    #[tokio::test]
    async fn test_rejection_is_reported_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let result = notifier().send(&url, "report").await;

        assert!(!result.success);
        assert_eq!(result.status_code, Some(500));
        assert_eq!(result.message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_unreachable_sink() {
        // Nothing listens here
        let result = notifier().send("http://127.0.0.1:9/hook", "report").await;

        assert!(!result.success);
        assert_eq!(result.status_code, None);
        assert!(result.message.is_some());
    }
}
