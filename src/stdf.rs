//! The STDF envelope, the normalized alert shape exchanged between the
//! converter and the slack stage.

use serde::{Deserialize, Serialize};

/// The only envelope version this crate produces and renders.
pub const STDF_VERSION: u32 = 2;

/// Subject (or `message_type` value) marking a body as an STDF envelope.
pub const STDF_SUBJECT: &str = "stdfMessage";

/// Prefix of every subject the converter publishes for STDF envelopes.
pub const STDF_SUBJECT_PREFIX: &str = "stdf: ";

/// Subject the converter publishes unrecognized messages under.
pub const UNRECOGNIZED_SUBJECT: &str = "unrecognizedNonStdfMessage";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Stdf {
    pub payload: Payload,
    pub meta: Meta,
    pub stdf_version: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub title: String,
    pub description: String,
    pub raw_data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    /// Milliseconds since the unix epoch, UTC.
    pub timestamp: i64,
    pub source: Source,
    /// Rendered in order; `None` means no link section at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<Link>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub provider: String,
    pub account_id: String,
    pub region: String,
    pub service: String,
    pub app_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub text: String,
}
