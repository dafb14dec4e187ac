use std::{env, fmt};
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub mod clients;
pub mod converter;
pub mod events;
pub mod slack;
pub mod stdf;

pub use clients::AwsClients;

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

/// Which half of the pipeline this deployment of the binary runs.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Stage {
    /// Classifies inbound notifications and republishes them as STDF.
    Converter,
    /// Renders STDF notifications and posts them to Slack.
    Slack,
}

impl Stage {
    pub fn load_from_env() -> Result<Stage, String> {
        env::var("STAGE")
            .map_err(|e| format!("STAGE not set - {}", e))
            .and_then(|s| s.parse::<Stage>())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "converter" => Ok(Stage::Converter),
            "slack" => Ok(Stage::Slack),
            other => Err(format!("Invalid or Unsupported stage {}", other)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
