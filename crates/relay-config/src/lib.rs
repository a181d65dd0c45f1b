#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod preprocess;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use preprocess::*;
pub use server::*;
pub use telemetry::*;
pub use upstream::*;

/// Top-level Relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener and health check
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion backend requests are forwarded to
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Message normalization
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    /// Token accounting
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
