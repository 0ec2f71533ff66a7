//! Turns any failed warehouse API call into a single user-facing message.
use warehouse_ext::rest::{Detail, ErrorOrigin, RawError};

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred!";
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error occurred";

/// Failure value of every warehouse operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct NormalizedError {
    /// Never empty.
    pub message: String,
    pub status_code: Option<u16>,
    pub raw: RawError,
}

impl From<RawError> for NormalizedError {
    fn from(raw: RawError) -> Self {
        normalize(raw)
    }
}

/// Build the user-facing error for a failed call and log it.
///
/// The first source that yields usable text wins:
/// 1. client-side failures: `"Error: <transport message>"`
/// 2. the body's `detail`; validation items render as `loc.path: msg`,
///    joined with `"; "`
/// 3. the body's `message`
/// 4. the transport message
/// 5. [`UNKNOWN_ERROR_MESSAGE`]
///
/// A client-side failure without a transport message goes straight to the
/// last step.
#[must_use]
pub fn normalize(error: RawError) -> NormalizedError {
    let message = describe(&error);
    tracing::error!(status_code = ?error.status_code, "Warehouse API Error: {message}");

    NormalizedError {
        message,
        status_code: error.status_code,
        raw: error,
    }
}

fn describe(error: &RawError) -> String {
    let transport_message = error.message.as_deref().filter(|m| !m.is_empty());

    let body = match &error.origin {
        ErrorOrigin::ClientSide => {
            return transport_message
                .map_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string(), |m| format!("Error: {m}"));
        }
        ErrorOrigin::ServerSide(body) => body,
    };

    if let Some(detail) = body.detail.as_ref().filter(|detail| detail.is_present()) {
        return describe_detail(detail);
    }

    body.message
        .as_deref()
        .filter(|m| !m.is_empty())
        .or(transport_message)
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
        .to_string()
}

fn describe_detail(detail: &Detail) -> String {
    let rendered = detail.to_string();
    if rendered.is_empty() {
        // Only a list can be present and still render empty
        VALIDATION_ERROR_MESSAGE.to_string()
    } else {
        rendered
    }
}
