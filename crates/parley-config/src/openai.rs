use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Environment variable consulted when no `api_key` is configured
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// `OpenAI` Chat Completions provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key (falls back to `OPENAI_API_KEY`)
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model used when a request names none
    #[serde(default = "default_model")]
    pub model: String,
    /// Model substituted when reasoning is requested; empty disables reasoning
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: Option<String>,
    /// Temperature used when a request names none
    #[serde(default = "default_temperature")]
    pub temperature: Option<f64>,
}

impl OpenAiConfig {
    /// Configured API key, else the `OPENAI_API_KEY` environment variable
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        crate::resolve_api_key(self.api_key.as_ref(), OPENAI_API_KEY_ENV)
    }

    /// Reasoning model, treating an empty string as "no reasoning variant"
    pub fn reasoning_model(&self) -> Option<&str> {
        self.reasoning_model.as_deref().filter(|m| !m.trim().is_empty())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            reasoning_model: default_reasoning_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://api.openai.com/v1").expect("valid default URL")
}

fn default_model() -> String {
    "gpt-4o".to_owned()
}

#[allow(clippy::unnecessary_wraps)]
fn default_reasoning_model() -> Option<String> {
    Some("o1".to_owned())
}

#[allow(clippy::unnecessary_wraps)]
const fn default_temperature() -> Option<f64> {
    Some(1.0)
}
