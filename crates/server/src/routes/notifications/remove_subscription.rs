use axum::{extract::rejection::JsonRejection, Json};
use shared::api::{
    error::ServerError,
    payloads::{MessageResponse, RemoveSubscriptionRequest},
    response_errors::RemoveSubscriptionError,
};
use tracing::{debug, info, instrument, warn};

use crate::SubscriptionRegistry;

#[instrument(skip_all)]
pub async fn remove_subscription(
    registry: SubscriptionRegistry,
    payload: Result<Json<RemoveSubscriptionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServerError<RemoveSubscriptionError>> {
    let Json(req) = payload.map_err(|e| {
        warn!("Invalid remove subscription request: {e}");
        RemoveSubscriptionError::invalid_input(e.body_text())
    })?;
    let endpoint = req.validate()?;

    debug!("Received /remove-subscription request for endpoint: {endpoint}");

    if registry.remove(&endpoint) {
        info!("Subscription with endpoint {endpoint} removed successfully.");
    } else {
        warn!("No subscription found with endpoint {endpoint} to remove.");
    }
    debug!("Total subscriptions now: {}", registry.len());

    Ok(Json(MessageResponse::new("Subscription removed or was not found.")))
}
