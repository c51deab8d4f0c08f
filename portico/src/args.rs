use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Portico gateway web API
#[derive(Debug, Parser)]
#[command(name = "portico", about = "Web API front for a remote desktop gateway")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "portico.toml", env = "PORTICO_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PORTICO_LISTEN")]
    pub listen: Option<SocketAddr>,
}
