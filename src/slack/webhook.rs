use crate::slack::blocks::SlackMessage;
use crate::slack::config::Webhook;
use async_trait::async_trait;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::StatusCode;
use std::time::Instant;
use tracing::{debug, info};

const HTTPS_PORT: u16 = 443;

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to serialize slack message: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Request to slack failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request to slack returned an error {0}")]
    Status(u16),
}

#[async_trait]
pub trait Delivery: Send + Sync {
    async fn post(&self, webhook: &Webhook, message: &SlackMessage) -> Result<(), DeliveryError>;
}

pub struct WebhookClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl WebhookClient {
    pub fn new() -> Self {
        WebhookClient {
            client: reqwest::Client::new(),
            base_url: None,
        }
    }

    /// Sends every request to `base_url` followed by the webhook path,
    /// ignoring the webhook host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        WebhookClient {
            client: reqwest::Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    pub fn url(&self, webhook: &Webhook) -> String {
        match &self.base_url {
            Some(base_url) => format!("{}{}", base_url.trim_end_matches('/'), webhook.path),
            None => format!("https://{}:{}{}", webhook.host, HTTPS_PORT, webhook.path),
        }
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Delivery for WebhookClient {
    async fn post(&self, webhook: &Webhook, message: &SlackMessage) -> Result<(), DeliveryError> {
        let body = serde_json::to_string(message)?;
        let uri = self.url(webhook);
        debug!("posting slack message: {}", body);

        let start = Instant::now();
        let bytes = body.len();
        let response = self
            .client
            .post(&uri)
            .header(CONTENT_TYPE, "application/json")
            .header(
                USER_AGENT,
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .body(body)
            .send()
            .await?;

        info!(
            status = %response.status(),
            bytes,
            elapsed_ms = start.elapsed().as_millis(),
            host = %webhook.host,
            "slack webhook request completed"
        );

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(DeliveryError::Status(status.as_u16())),
        }
    }
}
