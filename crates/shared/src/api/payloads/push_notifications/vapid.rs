use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VapidResponse {
    /// Application server public key, base64url encoded
    pub key: String,
}
