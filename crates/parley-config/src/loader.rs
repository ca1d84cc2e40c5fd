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

        let config = Self::from_toml(&raw)?;
        tracing::debug!(path = %path.display(), "configuration loaded");

        Ok(config)
    }

    /// Load from a file when it exists, otherwise fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
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
    /// Returns an error if a pattern, limit, or temperature is invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_openai()?;
        self.validate_anthropic()?;
        Ok(())
    }

    fn validate_openai(&self) -> anyhow::Result<()> {
        if let Some(temperature) = self.openai.temperature {
            validate_temperature("openai", temperature)?;
        }

        if self.openai.model.trim().is_empty() {
            anyhow::bail!("openai.model must not be empty");
        }

        Ok(())
    }

    fn validate_anthropic(&self) -> anyhow::Result<()> {
        let anthropic = &self.anthropic;

        validate_temperature("anthropic", anthropic.temperature)?;

        if anthropic.model.trim().is_empty() {
            anyhow::bail!("anthropic.model must not be empty");
        }

        if anthropic.max_tokens == 0 {
            anyhow::bail!("anthropic.max_tokens must be greater than 0");
        }

        if anthropic.thinking_budget == 0 {
            anyhow::bail!("anthropic.thinking_budget must be greater than 0");
        }

        for pattern in &anthropic.thinking_models {
            regex::Regex::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid anthropic.thinking_models pattern '{pattern}': {e}"))?;
        }

        Ok(())
    }
}

fn validate_temperature(provider: &str, temperature: f64) -> anyhow::Result<()> {
    if !temperature.is_finite() || temperature < 0.0 {
        anyhow::bail!("{provider}.temperature must be a non-negative number, got {temperature}");
    }
    Ok(())
}
