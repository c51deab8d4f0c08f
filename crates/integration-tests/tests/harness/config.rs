//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use portico_config::{AuthConfig, Config, CorsConfig, HealthConfig, ServerConfig};
use secrecy::SecretString;

/// Gateway secret used by every test config with auth enabled
pub const GATEWAY_SECRET: &str = "test-gateway-secret";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                auth: None,
                telemetry: None,
            },
        }
    }

    /// Enable the internal session endpoints
    pub fn with_auth(mut self) -> Self {
        self.config.auth = Some(AuthConfig {
            enabled: true,
            gateway_secret: SecretString::from(GATEWAY_SECRET),
            session_timeout_seconds: 60,
            session_capacity: 100,
        });
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Limit buffered form bodies to `limit` bytes
    pub fn with_form_body_limit(mut self, limit: usize) -> Self {
        self.config.server.form_body_limit = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
