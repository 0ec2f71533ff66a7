use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::Detail;

/// JSON body the warehouse API sends with a non-2xx response
#[derive(Clone, Default, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct ErrorBody {
    /// Structured or scalar explanation of the failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub detail: Option<Detail>,
    /// Generic application-level error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Decode a response body without ever failing.
    ///
    /// Bodies that are not a JSON object decode to an empty body. Fields of
    /// an unexpected type are dropped individually, so a usable `detail` is
    /// kept even if `message` is malformed and vice versa.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice::<serde_json::Value>(bytes)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            detail: object
                .get("detail")
                .filter(|detail| !detail.is_null())
                .and_then(|detail| Detail::deserialize(detail).ok()),
            message: object
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Where a failed call broke down.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorOrigin {
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout and the like.
    ClientSide,
    /// The server answered with a failure.
    ServerSide(ErrorBody),
}

/// A failed warehouse API call, decoded once at the transport boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct RawError {
    pub origin: ErrorOrigin,
    /// HTTP status of the response, if one was received
    pub status_code: Option<u16>,
    /// Transport-level description of the failure
    pub message: Option<String>,
}

impl Default for RawError {
    fn default() -> Self {
        Self {
            origin: ErrorOrigin::ServerSide(ErrorBody::default()),
            status_code: None,
            message: None,
        }
    }
}

impl RawError {
    #[must_use]
    pub fn client_side(message: impl Into<String>) -> Self {
        Self {
            origin: ErrorOrigin::ClientSide,
            status_code: None,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn server_side(body: ErrorBody) -> Self {
        Self {
            origin: ErrorOrigin::ServerSide(body),
            status_code: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn is_client_side(&self) -> bool {
        matches!(self.origin, ErrorOrigin::ClientSide)
    }

    /// The server supplied body, `None` for client-side failures.
    #[must_use]
    pub fn body(&self) -> Option<&ErrorBody> {
        match &self.origin {
            ErrorOrigin::ClientSide => None,
            ErrorOrigin::ServerSide(body) => Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::{DetailEntry, ValidationItem};

    #[test]
    fn test_error_body_serialization() {
        let json = serde_json::json!({
            "detail": [{"loc": ["body", "num_floors"], "msg": "Field required"}],
            "message": "Invalid warehouse configuration"
        });

        let body: ErrorBody = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(
            body,
            ErrorBody::builder()
                .detail(Detail::Items(vec![DetailEntry::Item(ValidationItem::new(
                    ["body", "num_floors"],
                    "Field required"
                ))]))
                .message("Invalid warehouse configuration")
                .build()
        );
        assert_eq!(serde_json::to_value(body).unwrap(), json);
    }

    #[test]
    fn test_non_json_body_is_empty() {
        let body = ErrorBody::from_slice(b"<html><body>Bad Gateway</body></html>");
        assert_eq!(body, ErrorBody::default());

        let body = ErrorBody::from_slice(br#""just a string""#);
        assert_eq!(body, ErrorBody::default());
    }

    #[test]
    fn test_malformed_fields_are_dropped_individually() {
        let body = ErrorBody::from_slice(br#"{"detail": "Warehouse not found", "message": 404}"#);
        assert_eq!(
            body,
            ErrorBody::builder()
                .detail(Detail::Message("Warehouse not found".to_string()))
                .build()
        );

        let body = ErrorBody::from_slice(br#"{"detail": null, "message": "gone"}"#);
        assert_eq!(body, ErrorBody::builder().message("gone").build());
    }

    #[test]
    fn test_raw_error_constructors() {
        let error = RawError::client_side("connection refused");
        assert!(error.is_client_side());
        assert!(error.body().is_none());
        assert_eq!(error.message.as_deref(), Some("connection refused"));

        let error = RawError::server_side(ErrorBody::default())
            .with_status_code(500)
            .with_message("Http failure response");
        assert!(!error.is_client_side());
        assert_eq!(error.body(), Some(&ErrorBody::default()));
        assert_eq!(error.status_code, Some(500));
    }
}
