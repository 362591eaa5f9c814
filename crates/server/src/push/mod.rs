use std::fmt::Debug;

use async_trait::async_trait;
use shared::model::PushNotificationSubscription;

use crate::DeliveryError;

mod dispatch;
pub use dispatch::*;

mod webpush;
pub use webpush::*;

/// Delivers one payload to one subscription
///
/// Failures carry the status the push service answered with, if any, so the
/// caller can tell a dead endpoint from a temporary problem.
#[async_trait]
pub trait PushTransport: Send + Sync + Debug {
    async fn send(
        &self,
        subscription: &PushNotificationSubscription,
        payload: &str,
    ) -> Result<(), DeliveryError>;
}
