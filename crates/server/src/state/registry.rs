use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use dashmap::{mapref::entry::Entry, DashMap};
use shared::model::{PushNotificationSubscription, UserId};

use crate::AppState;

#[derive(Debug, Clone)]
pub struct SubscriptionRecord {
    pub endpoint: String,
    pub user_id: UserId,
    pub subscription: PushNotificationSubscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Added,
    Updated,
}

type Endpoint = String;

/// In-memory set of push subscriptions keyed by endpoint
///
/// Nothing is persisted, every subscription is lost when the process exits
/// and clients have to register again.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry(Arc<DashMap<Endpoint, SubscriptionRecord>>);

impl SubscriptionRegistry {
    /// Adds the subscription or replaces the owner and details of the one
    /// already registered with the same endpoint
    pub fn upsert(
        &self,
        endpoint: String,
        user_id: UserId,
        subscription: PushNotificationSubscription,
    ) -> Upserted {
        let record = SubscriptionRecord {
            endpoint: endpoint.clone(),
            user_id,
            subscription,
        };

        match self.0.entry(endpoint) {
            Entry::Occupied(mut e) => {
                e.insert(record);
                Upserted::Updated
            },
            Entry::Vacant(e) => {
                e.insert(record);
                Upserted::Added
            },
        }
    }

    /// Returns true if there was a subscription to remove
    pub fn remove(&self, endpoint: &str) -> bool {
        self.0.remove(endpoint).is_some()
    }

    /// Subscriptions belonging to `target`, or all of them if there's no target
    pub fn select(&self, target: Option<&UserId>) -> Vec<SubscriptionRecord> {
        self.0
            .iter()
            .filter(|r| target.map_or(true, |t| r.value().user_id.matches(t)))
            .map(|r| r.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromRef<AppState> for SubscriptionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SubscriptionRegistry
where
    S: Send + Sync,
    SubscriptionRegistry: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(SubscriptionRegistry::from_ref(state))
    }
}
