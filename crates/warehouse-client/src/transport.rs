//! HTTP transport for the warehouse API.
//!
//! The transport is the only place that looks at raw HTTP responses.
//! Every failure leaves it as a [`RawError`] whose
//! [`ErrorOrigin`](warehouse_ext::rest::ErrorOrigin) tells client-side and
//! server-side failures apart.
use std::str::FromStr;

use http::Method;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use typed_builder::TypedBuilder;
use warehouse_ext::rest::{ErrorBody, RawError};

use crate::ClientConfig;

/// Identifier of a warehouse, as assigned by the server.
///
/// Always a single, non-empty path segment other than `.` or `..`, which
/// URL normalization would collapse into a different route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WarehouseId(String);

impl WarehouseId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid warehouse id `{0}`: must be non-empty and neither `.` nor `..`")]
pub struct InvalidWarehouseId(String);

impl TryFrom<String> for WarehouseId {
    type Error = InvalidWarehouseId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        match id.as_str() {
            "" | "." | ".." => Err(InvalidWarehouseId(id)),
            _ => Ok(Self(id)),
        }
    }
}

impl FromStr for WarehouseId {
    type Err = InvalidWarehouseId;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Self::try_from(id.to_string())
    }
}

impl std::fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Routes of the warehouse API.
#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    CreateWarehouse,
    ValidateConfig,
    GetWarehouse(WarehouseId),
    DeleteWarehouse(WarehouseId),
}

impl Endpoint {
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CreateWarehouse | Endpoint::ValidateConfig => Method::POST,
            Endpoint::GetWarehouse(_) => Method::GET,
            Endpoint::DeleteWarehouse(_) => Method::DELETE,
        }
    }

    /// Path below the base URI, one entry per segment.
    #[must_use]
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            Endpoint::CreateWarehouse => vec!["warehouse", "create"],
            Endpoint::ValidateConfig => vec!["warehouse", "validate"],
            Endpoint::GetWarehouse(id) => vec!["warehouse", id.as_str()],
            Endpoint::DeleteWarehouse(id) => vec!["warehouse", id.as_str(), "delete"],
        }
    }

    /// Name of the operation, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct WarehouseRequest {
    pub endpoint: Endpoint,
    /// JSON body, sent for `POST` routes.
    #[builder(default, setter(strip_option))]
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to build HTTP client for the warehouse API")]
pub struct ClientBuildError(#[from] reqwest::Error);

/// Issues a single request against the warehouse API.
///
/// Implementations resolve to the JSON payload of a successful response
/// or to the decoded failure. They never retry.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: WarehouseRequest) -> Result<serde_json::Value, RawError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a transport for the configured base URI.
    ///
    /// # Errors
    /// - The TLS backend cannot be initialized
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WarehouseRequest) -> Result<serde_json::Value, RawError> {
        let WarehouseRequest { endpoint, body } = request;
        let url = self.config.endpoint_url(endpoint.path_segments());
        tracing::debug!(method = %endpoint.method(), %url, "Sending warehouse API request");

        let mut builder = self.client.request(endpoint.method(), url.clone());
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(client_side)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(client_side)?;

        if !status.is_success() {
            tracing::debug!(%status, %url, "Warehouse API responded with a failure status");
            return Err(RawError::server_side(ErrorBody::from_slice(&bytes))
                .with_status_code(status.as_u16())
                .with_message(format!("Http failure response for {url}: {status}")));
        }

        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(%status, %url, error = %e, "Warehouse API response is not JSON");
            RawError::server_side(ErrorBody::default())
                .with_status_code(status.as_u16())
                .with_message(format!("Http failure during parsing for {url}"))
        })
    }
}

fn client_side(error: reqwest::Error) -> RawError {
    let raw = RawError::client_side(error_chain(&error));
    match error.status() {
        Some(status) => raw.with_status_code(status.as_u16()),
        None => raw,
    }
}

// reqwest keeps the interesting part (refused, timed out, ...) in the source chain.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    std::iter::successors(Some(error), |e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
