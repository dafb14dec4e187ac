//! Slack Block Kit message model.
//!
//! Blocks are kept as semantic variants and only take their Block Kit shape
//! (`section`, `divider`, `context`) when serialized. [`MessageBuilder`] owns
//! the block order of an alert message, so callers cannot reorder it.

use crate::stdf::Link;
use itertools::Itertools;
use serde::{Serialize, Serializer};

const LINK_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header { app_name: String, title: String },
    Description(String),
    Code(String),
    Divider,
    Fields(Vec<String>),
    Links(Vec<Link>),
    Context(String),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock {
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<Text>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fields: Option<Vec<Text>>,
    },
    Divider,
    Context {
        elements: Vec<Text>,
    },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Text {
    Mrkdwn { text: String },
}

impl Block {
    /// The mrkdwn text this block displays, fields joined by newlines.
    pub fn text(&self) -> String {
        match self {
            Block::Header { app_name, title } => format!("*{}*: *{}*", app_name, title),
            Block::Description(description) => description.clone(),
            Block::Code(raw) => format!("```{}```", raw),
            Block::Divider => String::new(),
            Block::Fields(fields) => fields.join("\n"),
            Block::Links(links) => format_links(links),
            Block::Context(text) => text.clone(),
        }
    }

    fn to_wire(&self) -> WireBlock {
        let mrkdwn = |text: String| Text::Mrkdwn { text };
        match self {
            Block::Divider => WireBlock::Divider,
            Block::Fields(fields) => WireBlock::Section {
                text: None,
                fields: Some(fields.iter().cloned().map(mrkdwn).collect()),
            },
            Block::Context(_) => WireBlock::Context {
                elements: vec![mrkdwn(self.text())],
            },
            _ => WireBlock::Section {
                text: Some(mrkdwn(self.text())),
                fields: None,
            },
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

pub fn format_links(links: &[Link]) -> String {
    links
        .iter()
        .map(|link| format!("<{}|{}>", link.url, link.text))
        .join(LINK_SEPARATOR)
}

/// The JSON body posted to the webhook.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SlackMessage {
    Blocks { blocks: Vec<Block> },
    Fallback { text: String },
}

impl SlackMessage {
    pub fn fallback(reason: &str, message: &str) -> Self {
        SlackMessage::Fallback {
            text: format!(
                "{}. Failed to format the message. Using fallback mode!\n{}",
                reason, message
            ),
        }
    }
}

/// Builds an alert message. The header, description, code, divider, fields
/// and divider blocks always come first, then links, then the event id.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    leading: Vec<Block>,
    links: Option<Vec<Link>>,
    event_id: Option<String>,
}

impl MessageBuilder {
    pub fn new(
        app_name: &str,
        title: &str,
        description: &str,
        raw_data: &str,
        fields: Vec<String>,
    ) -> Self {
        let leading = vec![
            Block::Header {
                app_name: app_name.to_string(),
                title: title.to_string(),
            },
            Block::Description(description.to_string()),
            Block::Code(raw_data.to_string()),
            Block::Divider,
            Block::Fields(fields),
            Block::Divider,
        ];
        MessageBuilder {
            leading,
            links: None,
            event_id: None,
        }
    }

    /// An empty list adds no block.
    pub fn links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links).filter(|links| !links.is_empty());
        self
    }

    pub fn event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }

    pub fn build(self) -> SlackMessage {
        let mut blocks = self.leading;
        if let Some(links) = self.links {
            blocks.push(Block::Links(links));
        }
        if let Some(event_id) = self.event_id {
            blocks.push(Block::Context(format!("*Event id*: {}", event_id)));
        }
        SlackMessage::Blocks { blocks }
    }
}
