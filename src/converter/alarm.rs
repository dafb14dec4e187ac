use crate::converter::ConvertError;
use crate::stdf::{Link, Meta, Payload, Source, Stdf, STDF_VERSION};
use chrono::DateTime;
use serde::Deserialize;

/// Subject prefix CloudWatch uses when an alarm enters the ALARM state.
pub const ALARM_SUBJECT_PREFIX: &str = "ALARM: ";

const PROVIDER: &str = "AWS";
const SERVICE: &str = "CloudWatch";
const APP_NAME: &str = "Metric Alarm";
const ALARM_LINK_TEXT: &str = "Show alarm details";
const ALARM_CONSOLE_URL: &str = "https://console.aws.amazon.com/cloudwatch/home#alarmsV2:alarm/";

// StateChangeTime looks like 2017-01-12T16:30:42.236+0000
const STATE_CHANGE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// The fields of a CloudWatch metric alarm notification the converter reads.
/// Everything else in the notification (trigger, old state, ...) is ignored.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MetricAlarm {
    pub alarm_name: String,
    // CloudWatch sends null for alarms created without a description
    pub alarm_description: Option<String>,
    #[serde(rename = "AWSAccountId")]
    pub aws_account_id: String,
    pub region: String,
    pub new_state_reason: String,
    pub state_change_time: String,
}

impl MetricAlarm {
    pub fn from_json(message: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(message)?)
    }

    pub fn state_change_millis(&self) -> Result<i64, ConvertError> {
        DateTime::parse_from_str(&self.state_change_time, STATE_CHANGE_TIME_FORMAT)
            .map(|time| time.timestamp_millis())
            .map_err(|source| ConvertError::StateChangeTime {
                value: self.state_change_time.clone(),
                source,
            })
    }

    pub fn into_stdf(self) -> Result<Stdf, ConvertError> {
        let timestamp = self.state_change_millis()?;
        let urls = vec![Link {
            url: format!("{}{}", ALARM_CONSOLE_URL, self.alarm_name),
            text: ALARM_LINK_TEXT.to_string(),
        }];

        Ok(Stdf {
            payload: Payload {
                title: self.alarm_name,
                description: self.alarm_description.unwrap_or_default(),
                raw_data: self.new_state_reason,
            },
            meta: Meta {
                timestamp,
                source: Source {
                    provider: PROVIDER.to_string(),
                    account_id: self.aws_account_id,
                    region: self.region,
                    service: SERVICE.to_string(),
                    app_name: APP_NAME.to_string(),
                    event_id: None,
                },
                urls: Some(urls),
            },
            stdf_version: STDF_VERSION,
        })
    }
}
