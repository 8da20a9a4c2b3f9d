//! reqwest-backed implementation of the [`ApiGateway`](crate::ApiGateway) seam.

mod api;
mod client;
mod config;

pub use client::HttpGateway;
pub use config::GatewayConfig;
