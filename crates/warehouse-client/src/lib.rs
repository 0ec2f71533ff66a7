#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

mod client;
mod config;
pub mod normalize;
pub mod transport;

pub use client::WarehouseClient;
pub use config::{ClientConfig, ConfigError};
pub use normalize::{normalize, NormalizedError};
pub use transport::{
    ClientBuildError, Endpoint, HttpTransport, InvalidWarehouseId, Transport, WarehouseId,
    WarehouseRequest,
};

pub use warehouse_ext::rest::*;

pub type Result<T, E = NormalizedError> = std::result::Result<T, E>;
