use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A browser push subscription as posted by the client
///
/// The registry keeps it verbatim and only ever looks at the endpoint. The
/// rest (keys, expiration time, ...) is for the push transport to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushNotificationSubscription(Value);

impl PushNotificationSubscription {
    pub fn new(details: Value) -> Self {
        Self(details)
    }

    /// The subscription endpoint, if it's present and not empty
    pub fn endpoint(&self) -> Option<&str> {
        self.0
            .get("endpoint")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
    }

    pub fn details(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for PushNotificationSubscription {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
