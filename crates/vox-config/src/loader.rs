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

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the speaker catalog is empty, the broker
    /// timings are zero, or the health path is not an absolute route
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.speakers.is_empty() {
            anyhow::bail!("at least one speaker must be configured");
        }

        // Router::route panics on paths without a leading slash; catch
        // it here with the other config errors.
        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.broker.default_timeout_secs == 0 {
            anyhow::bail!("broker.default_timeout_secs must be greater than zero");
        }

        if self.broker.sweep_interval_ms == 0 {
            anyhow::bail!("broker.sweep_interval_ms must be greater than zero");
        }

        for (name, speaker) in &self.speakers {
            if speaker.languages.is_empty() {
                anyhow::bail!("speaker '{name}' must list at least one language");
            }
        }

        Ok(())
    }
}
