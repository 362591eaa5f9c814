use axum::{extract::State, Json};
use shared::api::payloads::VapidResponse;

use crate::VapidPubKey;

/// The application server key clients pass to `PushManager.subscribe`
pub async fn vapid_public_key(State(key): State<VapidPubKey>) -> Json<VapidResponse> {
    Json(VapidResponse { key: key.into() })
}
