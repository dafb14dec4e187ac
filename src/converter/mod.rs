use crate::events;
use async_trait::async_trait;
use aws_lambda_events::event::sns::SnsEvent;
use aws_sdk_sns::operation::publish::PublishError;
use aws_sdk_sns::Client as SnsClient;
use lambda_runtime::{Error, LambdaEvent};
use tracing::{debug, info, warn};

pub mod alarm;
pub mod config;
pub mod process;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse alarm StateChangeTime {value:?}: {source}")]
    StateChangeTime {
        value: String,
        source: chrono::ParseError,
    },
    #[error("Failed to publish to {topic_arn}. Error: {error:?}")]
    Publish {
        topic_arn: String,
        error: PublishError,
    },
}

/// Destination of every notification the converter produces.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), ConvertError>;
}

/// Receives inbound events the converter could not classify.
pub trait Telemetry: Send + Sync {
    fn unrecognized_message(&self, event: &SnsEvent);
}

pub struct SnsPublisher {
    client: SnsClient,
    config: config::Config,
}

impl SnsPublisher {
    pub fn new(client: SnsClient, config: config::Config) -> Self {
        SnsPublisher { client, config }
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), ConvertError> {
        let topic_arn = &self.config.outgoing_topic_arn;
        debug!("publishing to {}: {}", topic_arn, subject);
        self.client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|error| ConvertError::Publish {
                topic_arn: topic_arn.clone(),
                error: error.into_service_error(),
            })?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn unrecognized_message(&self, event: &SnsEvent) {
        warn!(target: "unrecognized_message_format", "{:?}", event);
    }
}

// lambda handler
pub async fn handler(
    publisher: &dyn Publisher,
    telemetry: &dyn Telemetry,
    evt: LambdaEvent<SnsEvent>,
) -> Result<(), Error> {
    info!("Handling converter invocation");
    debug!("Handling event: {:?}", evt.payload);

    let notification = events::single_notification(&evt.payload)?;
    let outbound = process::convert(notification.subject.as_deref(), &notification.message)?;

    if outbound.kind == process::MessageKind::Unrecognized {
        telemetry.unrecognized_message(&evt.payload);
    }
    publisher.publish(&outbound.subject, &outbound.message).await?;
    info!("Published {:?} message: {}", outbound.kind, outbound.subject);

    Ok(())
}
