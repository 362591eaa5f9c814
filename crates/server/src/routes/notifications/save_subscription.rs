use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use shared::api::{
    error::ServerError,
    payloads::{MessageResponse, SaveSubscriptionRequest},
    response_errors::SaveSubscriptionError,
};
use tracing::{debug, info, instrument, warn};

use crate::{SubscriptionRegistry, Upserted};

#[instrument(skip_all)]
pub async fn save_subscription(
    registry: SubscriptionRegistry,
    payload: Result<Json<SaveSubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError<SaveSubscriptionError>> {
    let Json(req) = payload.map_err(|e| {
        warn!("Invalid subscription data received: {e}");
        SaveSubscriptionError::invalid_input(e.body_text())
    })?;

    debug!("Received /save-subscription request for user: {:?}", req.user_id);

    let sub = req.validate().map_err(|e| {
        warn!("Invalid subscription data received: {e}");
        e
    })?;

    match registry.upsert(sub.endpoint.clone(), sub.user_id.clone(), sub.subscription) {
        Upserted::Updated => info!("Updating existing subscription for endpoint: {}", sub.endpoint),
        Upserted::Added => info!("Adding new subscription for user: {}", sub.user_id),
    }
    debug!("Total subscriptions now: {}", registry.len());

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Subscription saved successfully.")),
    ))
}
