use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("Network request for {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("Request for {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("No cached response for {url}")]
    CacheMiss { url: String },
    #[error("Cache storage error: {0}")]
    Cache(String),
    /// Anything else the host environment threw at us
    #[error("{0}")]
    Host(String),
}

impl WorkerError {
    pub fn network<U: Into<String>, M: ToString>(url: U, message: M) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
