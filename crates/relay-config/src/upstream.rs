use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Backend used when no base URL is configured
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.githubcopilot.com";

/// Completion backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL; `/chat/completions` is appended when forwarding
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Bearer token sent to the backend
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Request timeout (e.g. "30s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl UpstreamConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a valid duration or is zero
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        let timeout = duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid upstream timeout '{}': {e}", self.timeout))?;

        if timeout.is_zero() {
            anyhow::bail!("upstream timeout must be greater than zero");
        }

        Ok(timeout)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout: default_timeout(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_URL).expect("valid default URL")
}

fn default_timeout() -> String {
    "120s".to_owned()
}
