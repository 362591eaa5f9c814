pub mod error;
pub mod payloads;
pub mod response_errors;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    SaveSubscription,
    RemoveSubscription,
    SendNotification,
    VapidPublicKey,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Ping => "/ping",
            SaveSubscription => "/save-subscription",
            RemoveSubscription => "/remove-subscription",
            SendNotification => "/send-notification",
            VapidPublicKey => "/vapid-public-key",
        }
    }
}
