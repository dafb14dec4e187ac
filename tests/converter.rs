use async_trait::async_trait;
use aws_lambda_events::sns::SnsEvent;
use lambda_runtime::{Context, LambdaEvent};
use pretty_assertions_sorted::assert_eq_sorted;
use serde_json::Value;
use stdf_notifier::converter::{self, ConvertError, Publisher, Telemetry};

use std::sync::Mutex;

pub fn sns_event_string(subjects_and_messages: &[(Option<&str>, &str)]) -> String {
    let records: Vec<Value> = subjects_and_messages
        .iter()
        .map(|(subject, message)| {
            serde_json::json!({
                "EventVersion": "1.0",
                "EventSubscriptionArn": "arn:aws:sns:us-east-2:123456789012:sns-lambda:21be56ed-a058-49f5-8c98-aedd2564c486",
                "EventSource": "aws:sns",
                "Sns": {
                    "Type": "Notification",
                    "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
                    "TopicArn": "arn:aws:sns:us-east-2:123456789012:sns-lambda",
                    "Subject": subject,
                    "Message": message,
                    "Timestamp": "2019-01-02T12:45:07.000Z",
                    "SignatureVersion": "1",
                    "Signature": "EXAMPLE",
                    "SigningCertUrl": "EXAMPLE",
                    "UnsubscribeUrl": "EXAMPLE",
                    "MessageAttributes": {}
                }
            })
        })
        .collect();
    serde_json::json!({ "Records": records }).to_string()
}

fn lambda_event(subjects_and_messages: &[(Option<&str>, &str)]) -> LambdaEvent<SnsEvent> {
    let evt: SnsEvent = serde_json::from_str(&sns_event_string(subjects_and_messages))
        .expect("failed to parse sns event");
    LambdaEvent::new(evt, Context::default())
}

#[derive(Default)]
pub struct FakePublisher {
    published: Mutex<Vec<(String, String)>>,
}

impl FakePublisher {
    pub fn take_published(&self) -> Vec<(String, String)> {
        std::mem::take(&mut self.published.lock().unwrap())
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), ConvertError> {
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTelemetry {
    unrecognized: Mutex<Vec<SnsEvent>>,
}

impl FakeTelemetry {
    pub fn take_unrecognized(&self) -> Vec<SnsEvent> {
        std::mem::take(&mut self.unrecognized.lock().unwrap())
    }
}

impl Telemetry for FakeTelemetry {
    fn unrecognized_message(&self, event: &SnsEvent) {
        self.unrecognized.lock().unwrap().push(event.clone());
    }
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("./tests/fixtures/{}", name)).expect("failed to read fixture")
}

#[test_log::test(tokio::test)]
async fn test_stdf_subject_is_forwarded_unchanged() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();
    let message = fixture("stdf_message.json");

    converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("stdfMessage"), &message)]),
    )
    .await
    .unwrap();

    let published = publisher.take_published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "stdf: Lambda errors in order-service");
    assert_eq!(published[0].1, message);
    assert!(telemetry.take_unrecognized().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_message_type_discriminator_is_forwarded() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();
    let message = r#"{"message_type": "stdfMessage", "payload": {"title": "from a service"}}"#;

    converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("Some service notification"), message)]),
    )
    .await
    .unwrap();

    assert_eq!(
        publisher.take_published(),
        vec![("stdf: from a service".to_string(), message.to_string())]
    );
}

#[test_log::test(tokio::test)]
async fn test_long_title_subject_is_truncated() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();
    let title = "a".repeat(120);
    let message = serde_json::json!({ "payload": { "title": title } }).to_string();

    converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("stdfMessage"), &message)]),
    )
    .await
    .unwrap();

    let published = publisher.take_published();
    assert_eq!(
        published[0].0,
        format!("stdf: {}[TRUNCATED]", "a".repeat(82))
    );
    assert_eq!(published[0].0.chars().count(), 99);
}

#[test_log::test(tokio::test)]
async fn test_metric_alarm_is_converted_to_stdf() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();
    let message = fixture("cloudwatch_alarm.json");

    converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(
            Some("ALARM: \"Example alarm name\" in EU (Ireland)"),
            &message,
        )]),
    )
    .await
    .unwrap();

    let published = publisher.take_published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "stdf: Example alarm name");

    let stdf: Value = serde_json::from_str(&published[0].1).unwrap();
    assert_eq_sorted!(
        stdf,
        serde_json::json!({
            "payload": {
                "title": "Example alarm name",
                "description": "Example alarm description.",
                "raw_data": "Threshold Crossed: 1 datapoint (10.0) was greater than or equal to the threshold (1.0)."
            },
            "meta": {
                "timestamp": 1484238642236i64,
                "source": {
                    "provider": "AWS",
                    "account_id": "000000000000",
                    "region": "EU - Ireland",
                    "service": "CloudWatch",
                    "app_name": "Metric Alarm"
                },
                "urls": [{
                    "url": "https://console.aws.amazon.com/cloudwatch/home#alarmsV2:alarm/Example alarm name",
                    "text": "Show alarm details"
                }]
            },
            "stdf_version": 2
        })
    );
    assert!(telemetry.take_unrecognized().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_conversion_is_deterministic() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();
    let message = fixture("cloudwatch_alarm.json");
    let records = [(Some("ALARM: \"Example alarm name\""), message.as_str())];

    converter::handler(&publisher, &telemetry, lambda_event(&records))
        .await
        .unwrap();
    converter::handler(&publisher, &telemetry, lambda_event(&records))
        .await
        .unwrap();

    let published = publisher.take_published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0], published[1]);
}

#[test_log::test(tokio::test)]
async fn test_unrecognized_message_is_forwarded_and_reported() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();
    let message = r#"{"detail-type": "EC2 Instance State-change Notification"}"#;

    converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("OK: \"cpu\" in US East"), message)]),
    )
    .await
    .unwrap();

    assert_eq!(
        publisher.take_published(),
        vec![(
            "unrecognizedNonStdfMessage".to_string(),
            message.to_string()
        )]
    );
    let reported = telemetry.take_unrecognized();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].records[0].sns.message, message);
}

#[test_log::test(tokio::test)]
async fn test_non_json_alarm_body_is_unrecognized() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();

    converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("ALARM: cpu"), "cpu is on fire")]),
    )
    .await
    .unwrap();

    assert_eq!(
        publisher.take_published(),
        vec![(
            "unrecognizedNonStdfMessage".to_string(),
            "cpu is on fire".to_string()
        )]
    );
    assert_eq!(telemetry.take_unrecognized().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_incomplete_alarm_fails_without_publishing() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();

    let result = converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("ALARM: cpu"), r#"{"AlarmName": "cpu"}"#)]),
    )
    .await;

    assert!(result.is_err());
    assert!(publisher.take_published().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_wrong_record_count_fails() {
    let publisher = FakePublisher::default();
    let telemetry = FakeTelemetry::default();

    let err = converter::handler(
        &publisher,
        &telemetry,
        lambda_event(&[(Some("a"), "a"), (Some("b"), "b")]),
    )
    .await
    .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("Received SNS message with 2 records."));
    assert!(publisher.take_published().is_empty());

    let err = converter::handler(&publisher, &telemetry, lambda_event(&[]))
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("Received SNS message with 0 records."));
}
