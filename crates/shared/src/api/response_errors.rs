use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::error::ServerError;

/// Declares a route error enum where every variant is tagged with the status
/// code it's returned with. The enum serializes untagged so the response body
/// is just the variant's fields
macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, Serialize, Deserialize, Error)]
        #[serde(untagged)]
        pub enum $name {
            $(
                #[error("{}::{}: {:?}", stringify!($name), stringify!($variant), self)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                let code = match &inner {
                    $( $name::$variant { .. } => $variant_code, )*
                };
                Self::Inner { code, inner }
            }
        }
    };
}

response_error!(SaveSubscriptionError {
    #[code(StatusCode::BAD_REQUEST)]
    InvalidInput { message: String },
});

impl SaveSubscriptionError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

response_error!(RemoveSubscriptionError {
    #[code(StatusCode::BAD_REQUEST)]
    InvalidInput { message: String },
});

impl RemoveSubscriptionError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// The send route reports under `error` rather than `message`
response_error!(SendNotificationError {
    #[code(StatusCode::BAD_REQUEST)]
    InvalidInput { error: String },
    #[code(StatusCode::INTERNAL_SERVER_ERROR)]
    Aggregation { error: String },
});

impl SendNotificationError {
    pub fn invalid_input<S: Into<String>>(error: S) -> Self {
        Self::InvalidInput {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_response_error_codes() {
        let err: ServerError<_> = SaveSubscriptionError::invalid_input("nope").into();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);

        let err: ServerError<_> = SendNotificationError::Aggregation {
            error: "join".to_string(),
        }
        .into();
        assert_eq!(err.code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_response_error_bodies_are_untagged() {
        let body = serde_json::to_value(RemoveSubscriptionError::invalid_input("missing")).unwrap();
        assert_eq!(body, json!({ "message": "missing" }));

        let body = serde_json::to_value(SendNotificationError::invalid_input("missing")).unwrap();
        assert_eq!(body, json!({ "error": "missing" }));
    }
}
