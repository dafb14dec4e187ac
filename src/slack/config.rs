use std::env;

use async_trait::async_trait;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Secrets Manager id of the secret holding the webhook host and path.
    pub webhook_secret_id: String,
}

impl Config {
    pub fn load_from_env() -> Result<Config, String> {
        let webhook_secret_id = env::var("SLACK_WEBHOOK_SECRET_ID")
            .map_err(|e| format!("SLACK_WEBHOOK_SECRET_ID not set - {}", e))?;

        Ok(Config { webhook_secret_id })
    }
}

/// Slack incoming webhook, split the way it is stored in the secret.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub host: String,
    pub path: String,
}

#[derive(thiserror::Error, Debug)]
pub enum WebhookSourceError {
    #[error("Failed to access AWS Secrets Manager. Please make sure the lambda function has permissions to access the {secret_id} secret. Error: {error:?}")]
    FailedToAccessSecretsManager {
        secret_id: String,
        error: GetSecretValueError,
    },
    #[error("Didn't find the {secret_id} secret in AWS secretsmanager")]
    MissingSecret { secret_id: String },
    #[error("The {secret_id} secret is not a webhook definition: {error}")]
    MalformedSecret {
        secret_id: String,
        error: serde_json::Error,
    },
}

#[async_trait]
pub trait WebhookSource: Send + Sync {
    async fn webhook(&self) -> Result<Webhook, WebhookSourceError>;
}

pub struct SecretsManagerWebhookSource {
    client: SecretsManagerClient,
    config: Config,
}

impl SecretsManagerWebhookSource {
    pub fn new(client: SecretsManagerClient, config: Config) -> Self {
        SecretsManagerWebhookSource { client, config }
    }
}

#[async_trait]
impl WebhookSource for SecretsManagerWebhookSource {
    async fn webhook(&self) -> Result<Webhook, WebhookSourceError> {
        let secret_id = self.config.webhook_secret_id.clone();
        let response = self
            .client
            .get_secret_value()
            .set_secret_id(Some(secret_id.clone()))
            .send()
            .await
            .map_err(|error| WebhookSourceError::FailedToAccessSecretsManager {
                secret_id: secret_id.clone(),
                error: error.into_service_error(),
            })?;
        let secret = response
            .secret_string
            .ok_or_else(|| WebhookSourceError::MissingSecret {
                secret_id: secret_id.clone(),
            })?;

        serde_json::from_str(&secret)
            .map_err(|error| WebhookSourceError::MalformedSecret { secret_id, error })
    }
}
