use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::{Conversation, ConversationTurn};

/// Logical completion request, independent of any provider
///
/// Optional fields left unset are filled from the adapter's defaults during
/// normalization; the request itself is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Conversation turns in dialogue order
    pub conversation: Conversation,
    /// Model identifier; the adapter default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stream the response as incremental events
    #[serde(default)]
    pub stream: bool,
    /// Request extended reasoning
    #[serde(default)]
    pub reasoning_enabled: bool,
    /// Reasoning token budget (providers with a budget knob only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_budget: Option<u32>,
    /// Provider-specific extras passed through to the wire request
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl CompletionRequest {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            ..Self::default()
        }
    }

    /// Single user turn
    pub fn user(prompt: impl Into<String>) -> Self {
        Self::new(vec![ConversationTurn::user(prompt)])
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub const fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub const fn with_reasoning(mut self, enabled: bool) -> Self {
        self.reasoning_enabled = enabled;
        self
    }

    pub const fn with_reasoning_budget(mut self, budget: u32) -> Self {
        self.reasoning_budget = Some(budget);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
