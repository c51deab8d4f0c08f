use std::path::Path;

use anyhow::Context as _;
use secrecy::ExposeSecret;

use crate::{AllowList, Config};

/// Upper bound on `auth.session_capacity`
const MAX_SESSION_CAPACITY: u64 = 1_000_000;

/// Paths served by built-in routes, which the health endpoint may not reuse
const RESERVED_PATHS: &[&str] = &["/api/session", "/internal/sessions"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents fail
    /// to expand, parse, or validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// Expands `{{ env.VAR }}` placeholders, then deserializes and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if variable expansion, TOML parsing, or
    /// validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;
        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server_config()?;
        self.validate_auth_config()?;
        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if self.server.form_body_limit == 0 {
            anyhow::bail!("server.form_body_limit must be greater than 0");
        }

        let health_path = self.server.health.path.as_str();

        if !health_path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if health_path.contains(['{', '}', '*']) {
            anyhow::bail!("server.health.path must not contain route parameters or wildcards");
        }

        if RESERVED_PATHS
            .iter()
            .any(|reserved| health_path == *reserved || health_path.starts_with(&format!("{reserved}/")))
        {
            anyhow::bail!("server.health.path '{health_path}' collides with a built-in route");
        }

        if let Some(ref cors) = self.server.cors
            && cors.credentials
            && (cors.origins == AllowList::Any || cors.headers == AllowList::Any || cors.methods == AllowList::Any)
        {
            anyhow::bail!("server.cors.credentials cannot be combined with wildcard origins, methods, or headers");
        }

        Ok(())
    }

    /// Validate auth configuration
    ///
    /// Session store limits apply whenever the section is present, since
    /// the store is built from them even with the internal endpoints off.
    fn validate_auth_config(&self) -> anyhow::Result<()> {
        let Some(ref auth) = self.auth else {
            return Ok(());
        };

        if auth.session_timeout_seconds == 0 {
            anyhow::bail!("auth.session_timeout_seconds must be greater than 0");
        }

        if auth.session_capacity == 0 {
            anyhow::bail!("auth.session_capacity must be greater than 0");
        }

        if auth.session_capacity > MAX_SESSION_CAPACITY {
            anyhow::bail!("auth.session_capacity exceeds maximum of 1,000,000");
        }

        if auth.enabled && auth.gateway_secret.expose_secret().is_empty() {
            anyhow::bail!("auth.gateway_secret must not be empty when auth is enabled");
        }

        Ok(())
    }
}
