//! Logging for Portico
//!
//! Installs a `tracing-subscriber` pipeline writing text or JSON lines

use portico_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging from configuration
///
/// `RUST_LOG` wins over the configured filter; `default_filter` applies
/// when neither is set.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let configured = config.map_or(default_filter, |c| c.filter.as_str());
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), configured)?;

    let format = config.map(|c| c.format).unwrap_or_default();
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);
            registry.with(fmt_layer).try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true);
            registry.with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}

fn build_filter(env_override: Option<&str>, configured: &str) -> anyhow::Result<EnvFilter> {
    let directive = env_override.filter(|d| !d.trim().is_empty()).unwrap_or(configured);
    EnvFilter::try_new(directive).map_err(|e| anyhow::anyhow!("invalid log filter `{directive}`: {e}"))
}
