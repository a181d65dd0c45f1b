use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Relay chat completion proxy
#[derive(Debug, Parser)]
#[command(
    name = "relay",
    about = "Chat completion proxy that normalizes messages and accounts tokens"
)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml", env = "RELAY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "RELAY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override the configured log filter
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,
}
