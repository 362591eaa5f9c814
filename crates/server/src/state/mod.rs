mod registry;
pub use registry::*;

mod transport;
pub use transport::*;

mod vapid_keys;
pub use vapid_keys::*;

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: SubscriptionRegistry,
    pub transport: Transport,
    pub vapid_pub_key: VapidPubKey,
}

impl AppState {
    pub fn new(transport: Transport, vapid_pub_key: VapidPubKey) -> Self {
        Self {
            registry: SubscriptionRegistry::default(),
            transport,
            vapid_pub_key,
        }
    }
}
