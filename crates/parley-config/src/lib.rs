//! Configuration for Parley
//!
//! A single TOML document with one table per provider plus logging settings.
//! Every field has a default, so an absent file or an empty table yields a
//! usable configuration.

#![allow(clippy::must_use_candidate)]

pub mod anthropic;
mod env;
mod loader;
pub mod openai;
pub mod telemetry;

use secrecy::SecretString;
use serde::Deserialize;

pub use anthropic::*;
pub use openai::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level Parley configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `OpenAI` provider settings
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Anthropic provider settings
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Prefer an explicitly configured key, else read the named environment variable
fn resolve_api_key(configured: Option<&SecretString>, env_var: &str) -> Option<SecretString> {
    configured.cloned().or_else(|| {
        std::env::var(env_var)
            .ok()
            .filter(|value| !value.is_empty())
            .map(SecretString::from)
    })
}
