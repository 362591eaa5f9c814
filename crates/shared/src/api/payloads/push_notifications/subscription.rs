use serde::{Deserialize, Serialize};

use crate::{
    api::response_errors::{RemoveSubscriptionError, SaveSubscriptionError},
    model::{PushNotificationSubscription, UserId},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubscriptionRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub subscription: Option<PushNotificationSubscription>,
}

/// A save request that has passed validation
#[derive(Debug, Clone)]
pub struct ValidSubscription {
    pub user_id: UserId,
    pub endpoint: String,
    pub subscription: PushNotificationSubscription,
}

impl SaveSubscriptionRequest {
    pub fn validate(self) -> Result<ValidSubscription, SaveSubscriptionError> {
        let invalid =
            || SaveSubscriptionError::invalid_input("User ID and a valid subscription object are required.");

        let user_id = self.user_id.and_then(UserId::non_empty).ok_or_else(invalid)?;
        let subscription = self.subscription.ok_or_else(invalid)?;
        let endpoint = subscription.endpoint().ok_or_else(invalid)?.to_string();

        Ok(ValidSubscription {
            user_id,
            endpoint,
            subscription,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveSubscriptionRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl RemoveSubscriptionRequest {
    pub fn validate(self) -> Result<String, RemoveSubscriptionError> {
        self.endpoint.filter(|e| !e.is_empty()).ok_or_else(|| {
            RemoveSubscriptionError::invalid_input("Endpoint is required to remove a subscription.")
        })
    }
}
