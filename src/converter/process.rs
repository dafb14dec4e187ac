use crate::converter::alarm::{MetricAlarm, ALARM_SUBJECT_PREFIX};
use crate::converter::ConvertError;
use crate::stdf::{STDF_SUBJECT, STDF_SUBJECT_PREFIX, UNRECOGNIZED_SUBJECT};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// SNS rejects subjects of 100 characters or more.
const MAX_SUBJECT_CHARS: usize = 99;
const TRUNCATED_SUBJECT_CHARS: usize = 88;
const TRUNCATION_MARKER: &str = "[TRUNCATED]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Stdf,
    MetricAlarm,
    Unrecognized,
}

/// What the converter publishes for one inbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub kind: MessageKind,
    pub subject: String,
    pub message: String,
}

#[derive(Deserialize)]
struct TitleOnly {
    payload: TitlePayload,
}

#[derive(Deserialize)]
struct TitlePayload {
    title: String,
}

/// Decides which of the three message categories a notification falls in.
/// Fails only if the body had to be inspected and is not JSON.
pub fn classify(subject: Option<&str>, message: &str) -> Result<MessageKind, serde_json::Error> {
    if subject == Some(STDF_SUBJECT) {
        return Ok(MessageKind::Stdf);
    }

    let body: Value = serde_json::from_str(message)?;
    if body.get("message_type").and_then(Value::as_str) == Some(STDF_SUBJECT) {
        return Ok(MessageKind::Stdf);
    }

    match subject {
        Some(subject) if subject.starts_with(ALARM_SUBJECT_PREFIX) => Ok(MessageKind::MetricAlarm),
        _ => Ok(MessageKind::Unrecognized),
    }
}

/// Turns one inbound notification into the notification to publish.
///
/// A body that is not JSON at all is forwarded as unrecognized. A body that is
/// JSON but lacks the fields its category requires is an error.
pub fn convert(subject: Option<&str>, message: &str) -> Result<Outbound, ConvertError> {
    let outbound = classify(subject, message)
        .map_err(ConvertError::from)
        .and_then(|kind| {
            debug!("Classified message as {:?}", kind);
            match kind {
                MessageKind::Stdf => stdf_outbound(MessageKind::Stdf, message.to_owned()),
                MessageKind::MetricAlarm => {
                    let stdf = MetricAlarm::from_json(message)?.into_stdf()?;
                    stdf_outbound(MessageKind::MetricAlarm, serde_json::to_string(&stdf)?)
                }
                MessageKind::Unrecognized => Ok(unrecognized(message)),
            }
        });

    match outbound {
        Err(ConvertError::Json(e)) if e.is_syntax() || e.is_eof() => {
            debug!("Message body is not JSON: {}", e);
            Ok(unrecognized(message))
        }
        other => other,
    }
}

fn stdf_outbound(kind: MessageKind, message: String) -> Result<Outbound, ConvertError> {
    let title = serde_json::from_str::<TitleOnly>(&message)?.payload.title;
    Ok(Outbound {
        kind,
        subject: stdf_subject(&title),
        message,
    })
}

fn unrecognized(message: &str) -> Outbound {
    Outbound {
        kind: MessageKind::Unrecognized,
        subject: UNRECOGNIZED_SUBJECT.to_string(),
        message: message.to_owned(),
    }
}

pub fn stdf_subject(title: &str) -> String {
    let subject = format!("{}{}", STDF_SUBJECT_PREFIX, title);
    if subject.chars().count() > MAX_SUBJECT_CHARS {
        let mut truncated: String = subject.chars().take(TRUNCATED_SUBJECT_CHARS).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        subject
    }
}
