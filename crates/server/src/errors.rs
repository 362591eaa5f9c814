use shared::api::{error::ServerError, response_errors::SendNotificationError};
use thiserror::Error;
use tracing::error;

/// Status codes a push service uses for a subscription that will never work again
pub const GONE_STATUS_CODES: [u16; 2] = [404, 410];

/// A single delivery attempt failed
#[derive(Debug, Clone, Error)]
#[error("Delivery to {endpoint} failed (status: {status:?}): {message}")]
pub struct DeliveryError {
    pub endpoint: String,
    pub status: Option<u16>,
    pub message: String,
}

impl DeliveryError {
    pub fn new<E: Into<String>, M: Into<String>>(endpoint: E, status: Option<u16>, message: M) -> Self {
        Self {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// The endpoint is gone for good and the subscription should be dropped
    pub fn is_permanent(&self) -> bool {
        self.status.map_or(false, |s| GONE_STATUS_CODES.contains(&s))
    }
}

/// Something went wrong in the dispatcher itself, as opposed to in one of the
/// deliveries
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to serialize notification: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Delivery task didn't complete: {0}")]
    Aggregation(#[from] tokio::task::JoinError),
}

impl From<DispatchError> for ServerError<SendNotificationError> {
    #[track_caller]
    fn from(err: DispatchError) -> Self {
        error!("Error sending notifications: {err}");
        match err {
            DispatchError::Payload(_) => ServerError::other("Failed to build notification payload."),
            DispatchError::Aggregation(_) => SendNotificationError::Aggregation {
                error: "Failed to send notifications.".to_string(),
            }
            .into(),
        }
    }
}
