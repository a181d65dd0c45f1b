use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the file marker is unusable, the upstream timeout
    /// is invalid, or the health path is not absolute
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_preprocess()?;
        self.upstream.timeout()?;

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }

    fn validate_preprocess(&self) -> anyhow::Result<()> {
        let marker = &self.preprocess.file_marker;

        if marker.trim().is_empty() {
            anyhow::bail!("preprocess.file_marker must not be empty");
        }

        // The path runs to the next newline, so a marker spanning lines could never match a path
        if marker.contains('\n') {
            anyhow::bail!("preprocess.file_marker must not contain a newline");
        }

        Ok(())
    }
}
