use std::sync::Arc;

use futures::future::join_all;
use shared::{api::payloads::Notification, model::UserId};
use tracing::{debug, error, info, instrument};

use crate::{DispatchError, SubscriptionRecord, SubscriptionRegistry, Transport};

/// What happened to one recipient of a send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The push service said the endpoint is gone so the subscription was dropped
    RemovedStale,
    /// Delivery failed for some other reason, the subscription is kept
    TransientError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub removed: usize,
    pub failed: usize,
}

impl DispatchReport {
    fn record(&mut self, outcome: DeliveryOutcome) {
        self.attempted += 1;
        match outcome {
            DeliveryOutcome::Delivered => self.delivered += 1,
            DeliveryOutcome::RemovedStale => self.removed += 1,
            DeliveryOutcome::TransientError => self.failed += 1,
        }
    }

    /// True when there was nobody to send to
    pub fn no_recipients(&self) -> bool {
        self.attempted == 0
    }
}

/// Sends the notification to every subscription of `target`, or to every
/// subscription if there is no target
///
/// Each delivery runs in its own task and they are all awaited, a failing
/// delivery never stops the others. Subscriptions whose endpoint is reported
/// gone are removed from the registry. Only a delivery task that couldn't be
/// joined is returned as an error.
#[instrument(skip_all, fields(target = ?target))]
pub async fn dispatch(
    registry: &SubscriptionRegistry,
    transport: &Transport,
    notification: &Notification,
    target: Option<&UserId>,
) -> Result<DispatchReport, DispatchError> {
    let recipients = registry.select(target);

    match target {
        Some(target) => info!(
            "Sending notification to user ID: {target}. Found {} subscriptions.",
            recipients.len()
        ),
        None => info!("Broadcasting notification to all {} subscribers.", recipients.len()),
    }

    let mut report = DispatchReport::default();
    if recipients.is_empty() {
        return Ok(report);
    }

    let payload: Arc<str> = notification.to_json_string()?.into();

    let tasks = recipients.into_iter().map(|record| {
        let registry = registry.clone();
        let transport = transport.clone();
        let payload = payload.clone();
        tokio::spawn(async move { deliver(&registry, &transport, record, &payload).await })
    });

    // Wait for everything before looking at any failures
    let mut join_error = None;
    for result in join_all(tasks).await {
        match result {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                error!("Delivery task failed: {e}");
                join_error.get_or_insert(e);
            },
        }
    }

    match join_error {
        Some(e) => Err(e.into()),
        None => {
            debug!(?report, "Dispatch complete");
            Ok(report)
        },
    }
}

async fn deliver(
    registry: &SubscriptionRegistry,
    transport: &Transport,
    record: SubscriptionRecord,
    payload: &str,
) -> DeliveryOutcome {
    match transport.send(&record.subscription, payload).await {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(e) if e.is_permanent() => {
            info!(
                "Subscription {} has expired or is no longer valid. Removing it.",
                record.endpoint
            );
            registry.remove(&record.endpoint);
            DeliveryOutcome::RemovedStale
        },
        Err(e) => {
            error!("Error sending notification to {}: {e}", record.endpoint);
            DeliveryOutcome::TransientError
        },
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use serde_json::json;
    use shared::model::PushNotificationSubscription;
    use tokio::sync::Barrier;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::{push::PushTransport, DeliveryError};

    #[derive(Debug, Default)]
    struct FakeTransport {
        sent: Mutex<Vec<(String, String)>>,
        statuses: HashMap<String, Option<u16>>,
        panic_on: Option<String>,
        barrier: Option<Barrier>,
    }

    impl FakeTransport {
        fn failing(statuses: &[(&str, Option<u16>)]) -> Self {
            Self {
                statuses: statuses.iter().map(|(e, s)| (e.to_string(), *s)).collect(),
                ..Default::default()
            }
        }

        fn sent_endpoints(&self) -> Vec<String> {
            let mut endpoints: Vec<_> = self.sent.lock().unwrap().iter().map(|(e, _)| e.clone()).collect();
            endpoints.sort();
            endpoints
        }
    }

    #[async_trait]
    impl PushTransport for FakeTransport {
        async fn send(
            &self,
            subscription: &PushNotificationSubscription,
            payload: &str,
        ) -> Result<(), DeliveryError> {
            let endpoint = subscription.endpoint().unwrap_or_default().to_string();
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if self.panic_on.as_deref() == Some(endpoint.as_str()) {
                panic!("transport blew up");
            }
            self.sent.lock().unwrap().push((endpoint.clone(), payload.to_string()));
            match self.statuses.get(&endpoint) {
                Some(status) => Err(DeliveryError::new(endpoint, *status, "failed")),
                None => Ok(()),
            }
        }
    }

    fn registry_with(subs: &[(&str, &str)]) -> SubscriptionRegistry {
        let registry = SubscriptionRegistry::default();
        for (endpoint, user) in subs {
            registry.upsert(
                endpoint.to_string(),
                UserId::from(*user),
                PushNotificationSubscription::new(json!({ "endpoint": endpoint })),
            );
        }
        registry
    }

    fn notification() -> Notification {
        Notification {
            title: "Hi".to_string(),
            body: "There".to_string(),
            url: "/".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_target_user() {
        let registry = registry_with(&[("E1", "u1"), ("E2", "u2")]);
        let fake = Arc::new(FakeTransport::default());
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let report = assert_ok!(dispatch(&registry, &transport, &notification(), Some(&"u1".into())).await);

        assert_eq!(report.attempted, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(fake.sent_endpoints(), vec!["E1"]);

        let payload: serde_json::Value = serde_json::from_str(&fake.sent.lock().unwrap()[0].1).unwrap();
        assert_eq!(payload, json!({ "title": "Hi", "body": "There", "url": "/" }));
    }

    #[tokio::test]
    async fn test_dispatch_broadcast() {
        let registry = registry_with(&[("E1", "u1"), ("E2", "u2"), ("E3", "u2")]);
        let fake = Arc::new(FakeTransport::default());
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let report = assert_ok!(dispatch(&registry, &transport, &notification(), None).await);

        assert_eq!(report.delivered, 3);
        assert_eq!(fake.sent_endpoints(), vec!["E1", "E2", "E3"]);
    }

    #[tokio::test]
    async fn test_dispatch_no_recipients() {
        let registry = SubscriptionRegistry::default();
        let fake = Arc::new(FakeTransport::default());
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let report = assert_ok!(dispatch(&registry, &transport, &notification(), Some(&"u1".into())).await);

        assert!(report.no_recipients());
        assert!(fake.sent_endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_gone_endpoint_is_removed() {
        let registry = registry_with(&[("E1", "u1"), ("E2", "u1"), ("E3", "u1")]);
        let fake = Arc::new(FakeTransport::failing(&[("E2", Some(410))]));
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let report = assert_ok!(dispatch(&registry, &transport, &notification(), None).await);

        assert_eq!(report.removed, 1);
        assert_eq!(report.delivered, 2);
        let mut remaining: Vec<_> = registry.select(None).into_iter().map(|r| r.endpoint).collect();
        remaining.sort();
        assert_eq!(remaining, vec!["E1", "E3"]);
    }

    #[tokio::test]
    async fn test_dispatch_not_found_endpoint_is_removed() {
        let registry = registry_with(&[("E1", "u1")]);
        let fake = Arc::new(FakeTransport::failing(&[("E1", Some(404))]));
        let transport = Transport::from(fake as Arc<dyn PushTransport>);

        assert_ok!(dispatch(&registry, &transport, &notification(), None).await);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_transient_failure_keeps_subscription() {
        let registry = registry_with(&[("E1", "u1"), ("E2", "u1")]);
        let fake = Arc::new(FakeTransport::failing(&[("E1", Some(500)), ("E2", None)]));
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let report = assert_ok!(dispatch(&registry, &transport, &notification(), None).await);

        assert_eq!(report.failed, 2);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_deliveries_run_concurrently() {
        let registry = registry_with(&[("E1", "u1"), ("E2", "u1"), ("E3", "u1")]);
        // Every send waits until all three have started
        let fake = Arc::new(FakeTransport {
            barrier: Some(Barrier::new(3)),
            ..Default::default()
        });
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            dispatch(&registry, &transport, &notification(), None),
        )
        .await
        .expect("deliveries were not concurrent")
        .unwrap();

        assert_eq!(report.delivered, 3);
    }

    #[tokio::test]
    async fn test_dispatch_panicking_delivery_is_aggregation_error() {
        let registry = registry_with(&[("E1", "u1"), ("E2", "u1")]);
        let fake = Arc::new(FakeTransport {
            panic_on: Some("E1".to_string()),
            ..Default::default()
        });
        let transport = Transport::from(fake.clone() as Arc<dyn PushTransport>);

        let err = assert_err!(dispatch(&registry, &transport, &notification(), None).await);

        assert!(matches!(err, DispatchError::Aggregation(_)));
        // The other delivery still went out
        assert_eq!(fake.sent_endpoints(), vec!["E2"]);
    }
}
