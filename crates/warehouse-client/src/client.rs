use serde::Serialize;

use crate::normalize::normalize;
use crate::transport::{
    ClientBuildError, Endpoint, HttpTransport, Transport, WarehouseId, WarehouseRequest,
};
use crate::{ClientConfig, RawError, Result};

/// Client for the warehouse API.
///
/// Every operation issues exactly one request. Failures of any kind are
/// normalized into a [`NormalizedError`](crate::NormalizedError) and logged.
/// Warehouse configurations and server payloads are passed through as
/// opaque JSON.
#[derive(Debug, Clone)]
pub struct WarehouseClient<T = HttpTransport> {
    transport: T,
}

impl WarehouseClient<HttpTransport> {
    /// Create a client talking HTTP to `config.base_uri`.
    ///
    /// # Errors
    /// - The HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> WarehouseClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST warehouse/create`
    ///
    /// # Errors
    /// The configuration cannot be serialized or the call fails.
    #[tracing::instrument(skip_all)]
    pub async fn create_warehouse<C>(&self, config: &C) -> Result<serde_json::Value>
    where
        C: Serialize + Sync + ?Sized,
    {
        self.send_config(Endpoint::CreateWarehouse, config).await
    }

    /// `POST warehouse/validate`
    ///
    /// # Errors
    /// The configuration cannot be serialized or the call fails.
    #[tracing::instrument(skip_all)]
    pub async fn validate_config<C>(&self, config: &C) -> Result<serde_json::Value>
    where
        C: Serialize + Sync + ?Sized,
    {
        self.send_config(Endpoint::ValidateConfig, config).await
    }

    /// `GET warehouse/{id}`
    ///
    /// # Errors
    /// The call fails.
    #[tracing::instrument(skip_all, fields(warehouse_id = %id))]
    pub async fn get_warehouse(&self, id: &WarehouseId) -> Result<serde_json::Value> {
        self.send(
            WarehouseRequest::builder()
                .endpoint(Endpoint::GetWarehouse(id.clone()))
                .build(),
        )
        .await
    }

    /// `DELETE warehouse/{id}/delete`
    ///
    /// # Errors
    /// The call fails.
    #[tracing::instrument(skip_all, fields(warehouse_id = %id))]
    pub async fn delete_warehouse(&self, id: &WarehouseId) -> Result<serde_json::Value> {
        self.send(
            WarehouseRequest::builder()
                .endpoint(Endpoint::DeleteWarehouse(id.clone()))
                .build(),
        )
        .await
    }

    async fn send_config<C>(&self, endpoint: Endpoint, config: &C) -> Result<serde_json::Value>
    where
        C: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(config).map_err(|e| {
            normalize(RawError::client_side(format!(
                "Failed to serialize warehouse configuration: {e}"
            )))
        })?;

        self.send(
            WarehouseRequest::builder()
                .endpoint(endpoint)
                .body(body)
                .build(),
        )
        .await
    }

    async fn send(&self, request: WarehouseRequest) -> Result<serde_json::Value> {
        let operation = request.endpoint.name();
        let payload = self.transport.send(request).await.map_err(normalize)?;
        tracing::debug!(operation, "Warehouse API call succeeded");
        Ok(payload)
    }
}
