use serde::{Deserialize, Serialize};

use crate::{api::response_errors::SendNotificationError, model::UserId};

pub const DEFAULT_NOTIFICATION_URL: &str = "/";

/// The payload delivered to each subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub url: String,
}

impl Notification {
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target_user_id: Option<UserId>,
}

impl SendNotificationRequest {
    /// Builds the notification and works out who it's for. A missing or empty
    /// target means broadcast
    pub fn validate(self) -> Result<(Notification, Option<UserId>), SendNotificationError> {
        let (Some(title), Some(body)) = (
            self.title.filter(|t| !t.is_empty()),
            self.body.filter(|b| !b.is_empty()),
        ) else {
            return Err(SendNotificationError::invalid_input("Title and body are required."));
        };

        let url = self
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_NOTIFICATION_URL.to_string());

        let target = self.target_user_id.and_then(UserId::non_empty);

        Ok((Notification { title, body, url }, target))
    }
}
