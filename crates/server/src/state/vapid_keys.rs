use std::fmt;

use axum::extract::FromRef;

use crate::AppState;

/// The application server public key, base64url encoded as clients expect it
#[derive(Debug, Clone)]
pub struct VapidPubKey(String);

impl From<String> for VapidPubKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<VapidPubKey> for String {
    fn from(value: VapidPubKey) -> Self {
        value.0
    }
}

impl FromRef<AppState> for VapidPubKey {
    fn from_ref(state: &AppState) -> Self {
        state.vapid_pub_key.clone()
    }
}

/// The VAPID signing key, base64url encoded. Kept out of debug output
#[derive(Clone)]
pub struct VapidPrivateKey(String);

impl VapidPrivateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VapidPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VapidPrivateKey(..)")
    }
}

impl From<String> for VapidPrivateKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
