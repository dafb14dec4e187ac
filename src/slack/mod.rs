use crate::events::{self, Notification};
use crate::slack::blocks::SlackMessage;
use crate::slack::config::{Webhook, WebhookSource};
use crate::slack::webhook::{Delivery, DeliveryError};
use crate::stdf::{STDF_SUBJECT, STDF_SUBJECT_PREFIX};
use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{Error, LambdaEvent};
use tracing::{debug, info, warn};

pub mod blocks;
pub mod config;
pub mod format;
pub mod webhook;

const MISSING_SUBJECT_REASON: &str = "Missing subject";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    /// The fallback text was delivered; carries the reason it was needed.
    Fallback(String),
}

fn is_stdf_subject(subject: &str) -> bool {
    subject == STDF_SUBJECT || subject.starts_with(STDF_SUBJECT_PREFIX)
}

/// Renders and posts one notification.
///
/// Anything that goes wrong before the message reaches Slack is answered
/// with a single fallback post. A failing fallback post is returned as is.
pub async fn dispatch(
    delivery: &dyn Delivery,
    webhook: &Webhook,
    notification: &Notification,
) -> Result<Outcome, DeliveryError> {
    let reason = match notification.subject.as_deref() {
        Some(subject) if is_stdf_subject(subject) => {
            match primary(delivery, webhook, &notification.message).await {
                Ok(()) => {
                    info!("Message sent to Slack");
                    return Ok(Outcome::Delivered);
                }
                Err(reason) => {
                    warn!("Failed to send formatted message to Slack: {}", reason);
                    reason
                }
            }
        }
        Some(subject) => subject.to_string(),
        None => MISSING_SUBJECT_REASON.to_string(),
    };

    let fallback = SlackMessage::fallback(&reason, &notification.message);
    delivery.post(webhook, &fallback).await?;
    info!("Message sent to Slack in fallback mode");
    Ok(Outcome::Fallback(reason))
}

async fn primary(delivery: &dyn Delivery, webhook: &Webhook, message: &str) -> Result<(), String> {
    let slack_message = format::render(message).map_err(|e| e.to_string())?;
    delivery
        .post(webhook, &slack_message)
        .await
        .map_err(|e| e.to_string())
}

// lambda handler
pub async fn handler(
    webhook_source: &dyn WebhookSource,
    delivery: &dyn Delivery,
    evt: LambdaEvent<SnsEvent>,
) -> Result<(), Error> {
    info!("Handling slack invocation");
    debug!("Handling event: {:?}", evt.payload);

    let notification = events::single_notification(&evt.payload)?;
    let webhook = webhook_source.webhook().await?;
    let outcome = dispatch(delivery, &webhook, &notification).await?;
    debug!("Slack delivery outcome: {:?}", outcome);

    Ok(())
}
