use aws_lambda_events::event::sns::SnsEvent;
use tracing::debug;

/// The subject and body of the single SNS record a stage is invoked with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: Option<String>,
    pub message: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("Received SNS message with {0} records. This should never happen: AWS states all lambda SNS messages will always have exactly one record.")]
    UnexpectedRecordCount(usize),
}

// SNS always delivers exactly one record per lambda invocation. Anything else
// is a broken transport contract and aborts the invocation.
pub fn single_notification(event: &SnsEvent) -> Result<Notification, BatchError> {
    let [record] = event.records.as_slice() else {
        return Err(BatchError::UnexpectedRecordCount(event.records.len()));
    };
    debug!("SNS record: {:?}", record);

    Ok(Notification {
        subject: record.sns.subject.clone(),
        message: record.sns.message.clone(),
    })
}
