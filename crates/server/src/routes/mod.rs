use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use shared::api::Object;

use crate::{SubscriptionRegistry, Transport, VapidPubKey};

pub mod notifications;

mod ping;
pub use ping::*;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    SubscriptionRegistry: FromRef<S>,
    Transport: FromRef<S>,
    VapidPubKey: FromRef<S>,
{
    Router::new()
        .route(Object::Ping.path(), get(ping))
        .route(
            Object::SaveSubscription.path(),
            post(notifications::save_subscription),
        )
        .route(
            Object::RemoveSubscription.path(),
            post(notifications::remove_subscription),
        )
        .route(
            Object::SendNotification.path(),
            post(notifications::send_notification),
        )
        .route(Object::VapidPublicKey.path(), get(notifications::vapid_public_key))
}
