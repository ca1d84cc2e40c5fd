//! Parameter normalization
//!
//! Turns a provider-agnostic [`CompletionRequest`] into the exact parameter
//! set sent to one provider. Normalization is pure: it reads the request and
//! the injected defaults and returns a new value, so one request can be
//! reused across calls and providers.

pub mod anthropic;
pub mod openai;

use serde_json::{Map, Value};

pub use self::anthropic::AnthropicDefaults;
pub use self::openai::OpenAiDefaults;
use crate::error::LlmError;
use crate::protocol::anthropic::{AnthropicRequest, MESSAGES_PATH};
use crate::protocol::openai::{CHAT_COMPLETIONS_PATH, OpenAiRequest};
use crate::types::CompletionRequest;

/// Supported provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// `OpenAI` Chat Completions
    OpenAi,
    /// Anthropic Messages
    Anthropic,
}

impl ProviderKind {
    /// Short lowercase name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Injected defaults for one provider
#[derive(Debug, Clone)]
pub enum ProviderDefaults {
    /// `OpenAI` defaults
    OpenAi(OpenAiDefaults),
    /// Anthropic defaults
    Anthropic(AnthropicDefaults),
}

/// Provider-specific parameters, ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderParams {
    /// `OpenAI` chat completion request
    OpenAi(OpenAiRequest),
    /// Anthropic messages request
    Anthropic(AnthropicRequest),
}

impl ProviderParams {
    /// Provider these parameters are addressed to
    pub const fn provider(&self) -> ProviderKind {
        match self {
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::Anthropic(_) => ProviderKind::Anthropic,
        }
    }

    /// Endpoint path relative to the provider base URL
    pub const fn path(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => CHAT_COMPLETIONS_PATH,
            Self::Anthropic(_) => MESSAGES_PATH,
        }
    }

    /// Model the request will be sent to
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(req) => &req.model,
            Self::Anthropic(req) => &req.model,
        }
    }

    /// Whether the streaming endpoint variant is selected
    pub const fn is_stream(&self) -> bool {
        match self {
            Self::OpenAi(req) => req.stream,
            Self::Anthropic(req) => req.stream,
        }
    }

    /// Copy with the streaming flag replaced
    #[must_use]
    pub fn with_stream(self, stream: bool) -> Self {
        match self {
            Self::OpenAi(req) => Self::OpenAi(OpenAiRequest { stream, ..req }),
            Self::Anthropic(req) => Self::Anthropic(AnthropicRequest { stream, ..req }),
        }
    }

    /// Serialize to the JSON body sent over the wire
    pub fn to_body(&self) -> Result<Value, LlmError> {
        let body = match self {
            Self::OpenAi(req) => serde_json::to_value(req),
            Self::Anthropic(req) => serde_json::to_value(req),
        };
        body.map_err(|e| LlmError::Internal(anyhow::anyhow!("failed to serialize {} request: {e}", self.provider())))
    }
}

/// Normalize a request for the provider described by `defaults`
pub fn normalize(request: &CompletionRequest, defaults: &ProviderDefaults) -> Result<ProviderParams, LlmError> {
    match defaults {
        ProviderDefaults::OpenAi(defaults) => openai::normalize(request, defaults).map(ProviderParams::OpenAi),
        ProviderDefaults::Anthropic(defaults) => {
            anthropic::normalize(request, defaults).map(ProviderParams::Anthropic)
        }
    }
}

/// Copy caller extras, dropping keys normalization owns
fn passthrough_extras(extra: &Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, _)| {
            let owned = reserved.contains(&key.as_str());
            if owned {
                tracing::debug!(key = %key, "ignoring extra parameter owned by normalization");
            }
            !owned
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
