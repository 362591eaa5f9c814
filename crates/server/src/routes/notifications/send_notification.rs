use axum::{extract::rejection::JsonRejection, Json};
use shared::api::{
    error::ServerError,
    payloads::{MessageResponse, SendNotificationRequest},
    response_errors::SendNotificationError,
};
use tracing::{info, instrument, warn};

use crate::{push::dispatch, SubscriptionRegistry, Transport};

#[instrument(skip_all)]
pub async fn send_notification(
    registry: SubscriptionRegistry,
    transport: Transport,
    payload: Result<Json<SendNotificationRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServerError<SendNotificationError>> {
    let Json(req) = payload.map_err(|e| {
        warn!("Invalid send notification request: {e}");
        SendNotificationError::invalid_input(e.body_text())
    })?;
    let (notification, target) = req.validate()?;

    let report = dispatch(&registry, &transport, &notification, target.as_ref()).await?;

    if report.no_recipients() {
        info!("No matching subscriptions found to send notification.");
        return Ok(Json(MessageResponse::new("No matching subscriptions found to send.")));
    }

    info!(
        delivered = report.delivered,
        removed = report.removed,
        failed = report.failed,
        "Notifications sent"
    );
    Ok(Json(MessageResponse::new("Notifications sent successfully.")))
}
