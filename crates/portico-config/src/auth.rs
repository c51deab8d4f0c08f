use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Session authority configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Whether the internal session endpoints are mounted
    #[serde(default)]
    pub enabled: bool,

    /// Shared secret required on internal session endpoints
    pub gateway_secret: SecretString,

    /// Idle time after which a session expires, in seconds
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,

    /// Maximum number of live sessions
    #[serde(default = "default_session_capacity")]
    pub session_capacity: u64,
}

impl AuthConfig {
    pub const fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_seconds)
    }
}

const fn default_session_timeout() -> u64 {
    60 * 60
}

const fn default_session_capacity() -> u64 {
    10_000
}
