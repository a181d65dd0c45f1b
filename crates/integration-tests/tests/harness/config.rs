//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use relay_config::{Config, HealthConfig, PreprocessConfig, ServerConfig, UpstreamConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration listening on an ephemeral port
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                ..Config::default()
            },
        }
    }

    /// Forward completions to `base_url`
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.upstream = UpstreamConfig {
            base_url: base_url.parse().expect("valid URL"),
            timeout: "5s".to_owned(),
            ..UpstreamConfig::default()
        };
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.config.upstream.api_key = Some(SecretString::from(key));
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    pub fn without_file_inlining(mut self) -> Self {
        self.config.preprocess.inline_files = false;
        self
    }

    pub fn with_file_marker(mut self, marker: &str) -> Self {
        self.config.preprocess = PreprocessConfig {
            file_marker: marker.to_owned(),
            ..PreprocessConfig::default()
        };
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
