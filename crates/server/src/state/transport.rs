use std::{ops::Deref, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};

use crate::{push::PushTransport, AppState};

/// Shared handle to whatever delivers push messages
#[derive(Debug, Clone)]
pub struct Transport(Arc<dyn PushTransport>);

impl Transport {
    pub fn new<T: PushTransport + 'static>(transport: T) -> Self {
        Self(Arc::new(transport))
    }
}

impl From<Arc<dyn PushTransport>> for Transport {
    fn from(transport: Arc<dyn PushTransport>) -> Self {
        Self(transport)
    }
}

impl Deref for Transport {
    type Target = Arc<dyn PushTransport>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRef<AppState> for Transport {
    fn from_ref(state: &AppState) -> Self {
        state.transport.clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Transport
where
    S: Send + Sync,
    Transport: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Transport::from_ref(state))
    }
}
