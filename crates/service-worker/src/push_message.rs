use serde::Deserialize;
use tracing::warn;

/// Payload of an inbound push. Every field is optional, anything missing or
/// unreadable falls back to the agent's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushMessage {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

impl PushMessage {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Self>(text) {
            Ok(message) => Self {
                title: non_empty(message.title),
                body: non_empty(message.body),
                url: non_empty(message.url),
            },
            Err(e) => {
                warn!("Push data isn't a readable notification, using defaults: {e}");
                Self::default()
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
