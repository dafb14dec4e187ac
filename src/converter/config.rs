use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Topic every converted (or unrecognized) notification is published to.
    pub outgoing_topic_arn: String,
}

impl Config {
    pub fn load_from_env() -> Result<Config, String> {
        let outgoing_topic_arn = env::var("OUTGOING_SNS_TOPIC")
            .map_err(|e| format!("OUTGOING_SNS_TOPIC not set - {}", e))?;

        Ok(Config { outgoing_topic_arn })
    }
}
