use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Environment variable consulted when no `api_key` is configured
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic Messages provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key (falls back to `ANTHROPIC_API_KEY`)
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Value of the `anthropic-version` header
    #[serde(default = "default_version")]
    pub version: String,
    /// Model used when a request names none
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature used when a request names none
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Token limit used when a request names none
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Extended thinking budget used when a request names none
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
    /// Regex patterns of models that accept extended thinking
    #[serde(default = "default_thinking_models")]
    pub thinking_models: Vec<String>,
}

impl AnthropicConfig {
    /// Configured API key, else the `ANTHROPIC_API_KEY` environment variable
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        crate::resolve_api_key(self.api_key.as_ref(), ANTHROPIC_API_KEY_ENV)
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            version: default_version(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            thinking_budget: default_thinking_budget(),
            thinking_models: default_thinking_models(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://api.anthropic.com/v1").expect("valid default URL")
}

fn default_version() -> String {
    "2023-06-01".to_owned()
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_owned()
}

const fn default_temperature() -> f64 {
    1.0
}

const fn default_max_tokens() -> u32 {
    8192
}

const fn default_thinking_budget() -> u32 {
    10_000
}

fn default_thinking_models() -> Vec<String> {
    vec![
        "^claude-(opus|sonnet|haiku)-4".to_owned(),
        "^claude-3-7-sonnet".to_owned(),
    ]
}
