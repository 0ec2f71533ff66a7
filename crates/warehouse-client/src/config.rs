//! Configuration of the warehouse client
use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

const ENV_PREFIX: &str = "WAREHOUSE_CLIENT__";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid warehouse client configuration")]
    Extraction(#[source] Box<figment::Error>),
    #[error("Base URI `{0}` cannot be used as a base for warehouse routes")]
    InvalidBaseUri(Url),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root of the warehouse API. Routes are resolved below it, so
    /// `http://localhost:5000/api` serves `warehouse/create` from
    /// `http://localhost:5000/api/warehouse/create`.
    pub base_uri: Url,
    /// Upper bound for a single request, including reading the body.
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:5000/api/".parse().expect("Valid URL"),
            timeout_seconds: 30,
            user_agent: concat!("warehouse-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Load the configuration from `WAREHOUSE_CLIENT__*` environment
    /// variables on top of the defaults,
    /// e.g. `WAREHOUSE_CLIENT__BASE_URI=https://warehouses.example.com/api`.
    ///
    /// # Errors
    /// - A variable cannot be parsed into its field
    /// - The base URI cannot be a base (e.g. `mailto:`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Extract the configuration from an arbitrary figment.
    ///
    /// # Errors
    /// See [`ClientConfig::from_env`].
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Extraction(Box::new(e)))?;
        config.validated()
    }

    /// Replace the base URI.
    ///
    /// # Errors
    /// The base URI cannot be a base.
    pub fn with_base_uri(mut self, base_uri: Url) -> Result<Self, ConfigError> {
        self.base_uri = base_uri;
        self.validated()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Absolute URL of a route below the base URI. Every segment is
    /// percent-encoded on its own.
    #[must_use]
    pub fn endpoint_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_uri.clone();
        // `validated` guarantees the base URI can be a base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.base_uri.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUri(self.base_uri));
        }
        if !self.base_uri.path().ends_with('/') {
            let path = format!("{}/", self.base_uri.path());
            self.base_uri.set_path(&path);
        }
        Ok(self)
    }
}
