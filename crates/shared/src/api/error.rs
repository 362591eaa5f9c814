use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub use backend::*;

#[cfg(feature = "backend")]
mod backend {
    use axum::{
        response::{IntoResponse, Response},
        Json,
    };
    use http::StatusCode;
    use serde::Serialize;

    use super::{MessageBody, ServerError};

    impl<T: Serialize> IntoResponse for ServerError<T> {
        fn into_response(self) -> Response {
            match self {
                ServerError::Inner { code, inner } => (code, Json(inner)).into_response(),
                ServerError::Other { message } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageBody { message }),
                )
                    .into_response(),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageBody {
    message: String,
}

/// Error returned by a route
///
/// `Inner` carries a typed error body along with the status it maps to,
/// `Other` covers anything unexpected and is always a 500
#[derive(Debug, Clone)]
pub enum ServerError<T> {
    Inner { code: StatusCode, inner: T },
    Other { message: String },
}

impl<T> ServerError<T> {
    pub fn other<S: Into<String>>(message: S) -> Self {
        ServerError::Other {
            message: message.into(),
        }
    }

    pub fn code(&self) -> StatusCode {
        match self {
            ServerError::Inner { code, .. } => *code,
            ServerError::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServerError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Inner { code, inner } => write!(f, "{code}: {inner}"),
            ServerError::Other { message } => write!(f, "Other: {message}"),
        }
    }
}

impl<T: fmt::Debug + fmt::Display> std::error::Error for ServerError<T> {}
