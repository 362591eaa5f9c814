use std::fmt;

use async_trait::async_trait;
use shared::model::PushNotificationSubscription;
use tracing::trace;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessage, WebPushMessageBuilder,
};

use super::PushTransport;
use crate::{DeliveryError, VapidPrivateKey};

#[derive(Debug, Clone)]
pub struct VapidConfig {
    pub private_key: VapidPrivateKey,
    /// Contact for the push service, usually a `mailto:` url
    pub subject: String,
    pub ttl_seconds: u32,
}

/// Sends VAPID signed, aes128gcm encrypted messages to browser push services
pub struct WebPushTransport {
    client: IsahcWebPushClient,
    vapid: VapidConfig,
}

impl fmt::Debug for WebPushTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPushTransport")
            .field("subject", &self.vapid.subject)
            .field("ttl_seconds", &self.vapid.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl WebPushTransport {
    pub fn new(vapid: VapidConfig) -> Result<Self, WebPushError> {
        Ok(Self {
            client: IsahcWebPushClient::new()?,
            vapid,
        })
    }

    fn build_message(
        &self,
        info: &SubscriptionInfo,
        payload: &str,
    ) -> Result<WebPushMessage, DeliveryError> {
        let mut signature = VapidSignatureBuilder::from_base64(self.vapid.private_key.as_str(), info)
            .map_err(|e| delivery_error(&info.endpoint, e))?;
        signature.add_claim("sub", self.vapid.subject.as_str());
        let signature = signature
            .build()
            .map_err(|e| delivery_error(&info.endpoint, e))?;

        let mut builder = WebPushMessageBuilder::new(info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload.as_bytes());
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.vapid.ttl_seconds);

        builder.build().map_err(|e| delivery_error(&info.endpoint, e))
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &PushNotificationSubscription,
        payload: &str,
    ) -> Result<(), DeliveryError> {
        let info = subscription_info(subscription)?;
        let message = self.build_message(&info, payload)?;

        trace!("Sending push message to {}", info.endpoint);
        self.client
            .send(message)
            .await
            .map_err(|e| delivery_error(&info.endpoint, e))
    }
}

/// Reads the addressing information out of the stored subscription details
pub fn subscription_info(
    subscription: &PushNotificationSubscription,
) -> Result<SubscriptionInfo, DeliveryError> {
    serde_json::from_value(subscription.details().clone()).map_err(|e| {
        DeliveryError::new(
            subscription.endpoint().unwrap_or_default(),
            None,
            format!("Subscription details can't be used for delivery: {e}"),
        )
    })
}

/// Status code equivalent of the push service's answer, for the errors
/// where there is one that matters
fn status_code(err: &WebPushError) -> Option<u16> {
    match err {
        WebPushError::EndpointNotValid { .. } => Some(410),
        WebPushError::EndpointNotFound { .. } => Some(404),
        WebPushError::PayloadTooLarge { .. } => Some(413),
        _ => None,
    }
}

fn delivery_error(endpoint: &str, err: WebPushError) -> DeliveryError {
    DeliveryError::new(endpoint, status_code(&err), format!("{err:?}"))
}
