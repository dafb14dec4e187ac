use crate::slack::blocks::{MessageBuilder, SlackMessage};
use crate::stdf::{Stdf, STDF_VERSION};
use chrono::DateTime;

// The metadata section always reports the region the pipeline is deployed to.
const REGION_LABEL: &str = "*Region:* us-east-1";

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported stdf_version {0}, expected {expected}", expected = STDF_VERSION)]
    UnsupportedVersion(u32),
    #[error("Timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

/// Formats epoch milliseconds as `YYYY-MM-DDTHH:MM:SSZ`, dropping sub-second precision.
pub fn zulu_timestamp(unix_time_millis: i64) -> Result<String, RenderError> {
    DateTime::from_timestamp(unix_time_millis.div_euclid(1000), 0)
        .map(|time| time.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .ok_or(RenderError::TimestampOutOfRange(unix_time_millis))
}

pub fn format_stdf(stdf: &Stdf) -> Result<SlackMessage, RenderError> {
    if stdf.stdf_version != STDF_VERSION {
        return Err(RenderError::UnsupportedVersion(stdf.stdf_version));
    }

    let source = &stdf.meta.source;
    let fields = vec![
        format!("*Source:* {} {}", source.provider, source.service),
        format!("*Account id:* {}", source.account_id),
        format!("*Timestamp*: {}", zulu_timestamp(stdf.meta.timestamp)?),
        REGION_LABEL.to_string(),
    ];

    let mut builder = MessageBuilder::new(
        &source.app_name,
        &stdf.payload.title,
        &stdf.payload.description,
        &stdf.payload.raw_data,
        fields,
    );
    if let Some(urls) = &stdf.meta.urls {
        builder = builder.links(urls.clone());
    }
    if let Some(event_id) = &source.event_id {
        builder = builder.event_id(event_id);
    }

    Ok(builder.build())
}

pub fn render(message: &str) -> Result<SlackMessage, RenderError> {
    let stdf: Stdf = serde_json::from_str(message)?;
    format_stdf(&stdf)
}
