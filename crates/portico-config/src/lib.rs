#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use auth::*;
pub use cors::*;
pub use health::*;
pub use server::*;
pub use telemetry::*;

/// Top-level Portico configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Session authority configuration
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
