use std::path::Path;

use crate::Config;
use crate::faults::MAX_CAUSE_DEPTH_LIMIT;

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

        let expanded = crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_faults()?;
        self.validate_health()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_faults(&self) -> anyhow::Result<()> {
        let depth = self.faults.max_cause_depth;
        if !(1..=MAX_CAUSE_DEPTH_LIMIT).contains(&depth) {
            anyhow::bail!("faults.max_cause_depth must be between 1 and {MAX_CAUSE_DEPTH_LIMIT}, got {depth}");
        }
        Ok(())
    }

    fn validate_health(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }
        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        if let Some(tracing) = self.telemetry.as_ref().and_then(|t| t.tracing.as_ref())
            && !(0.0..=1.0).contains(&tracing.sampling_rate)
        {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }
        Ok(())
    }
}
