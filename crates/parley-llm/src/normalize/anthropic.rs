//! Anthropic parameter normalization
//!
//! Temperature and max tokens are mandatory on this provider, so defaults are
//! always filled in. Reasoning is a sidecar `thinking` block on the same model.
//! System turns move to the top-level `system` field because the Messages API
//! has no system role.

use parley_config::AnthropicConfig;
use regex::RegexSet;

use crate::error::LlmError;
use crate::protocol::anthropic::{AnthropicMessage, AnthropicRequest, AnthropicThinking, RESERVED_KEYS};
use crate::types::{CompletionRequest, ConversationTurn, Role};

/// Defaults injected into Anthropic normalization
#[derive(Debug, Clone)]
pub struct AnthropicDefaults {
    /// Model used when the request names none
    pub model: String,
    /// Temperature used when the request names none
    pub temperature: f64,
    /// Token limit used when the request names none
    pub max_tokens: u32,
    /// Thinking budget used when the request names none
    pub thinking_budget: u32,
    /// Models accepting a `thinking` block
    pub thinking_models: RegexSet,
}

impl AnthropicDefaults {
    /// Build from configuration, compiling the thinking model patterns
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a pattern is not a valid regex.
    pub fn from_config(config: &AnthropicConfig) -> Result<Self, LlmError> {
        let thinking_models = RegexSet::new(&config.thinking_models)
            .map_err(|e| LlmError::Configuration(format!("invalid thinking model pattern: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            thinking_budget: config.thinking_budget,
            thinking_models,
        })
    }

    /// Whether `model` accepts extended thinking
    pub fn supports_thinking(&self, model: &str) -> bool {
        self.thinking_models.is_match(model)
    }
}

impl Default for AnthropicDefaults {
    fn default() -> Self {
        let config = AnthropicConfig::default();
        Self {
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            thinking_budget: config.thinking_budget,
            thinking_models: RegexSet::new(&config.thinking_models).unwrap_or_else(|_| RegexSet::empty()),
        }
    }
}

impl From<&ConversationTurn> for AnthropicMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role.as_str().to_owned(),
            content: turn.content.clone(),
        }
    }
}

/// Build the Anthropic wire request for `request`
///
/// # Errors
///
/// Returns `UnsupportedParameterCombination` when reasoning is requested for a
/// model that does not accept extended thinking.
pub fn normalize(request: &CompletionRequest, defaults: &AnthropicDefaults) -> Result<AnthropicRequest, LlmError> {
    let model = request.model.clone().unwrap_or_else(|| defaults.model.clone());

    let thinking = if request.reasoning_enabled {
        if !defaults.supports_thinking(&model) {
            return Err(LlmError::UnsupportedParameterCombination(format!(
                "model '{model}' does not support extended thinking"
            )));
        }
        Some(AnthropicThinking::Enabled {
            budget_tokens: request.reasoning_budget.unwrap_or(defaults.thinking_budget),
        })
    } else {
        None
    };

    let (system, messages) = split_system(&request.conversation);

    Ok(AnthropicRequest {
        model,
        max_tokens: request.max_tokens.unwrap_or(defaults.max_tokens),
        system,
        messages,
        temperature: request.temperature.unwrap_or(defaults.temperature),
        stream: request.stream,
        thinking,
        extra: super::passthrough_extras(&request.extra, RESERVED_KEYS),
    })
}

/// Separate system turns from the dialogue, joining them in order
fn split_system(conversation: &[ConversationTurn]) -> (Option<String>, Vec<AnthropicMessage>) {
    let (system_turns, dialogue): (Vec<_>, Vec<_>) = conversation.iter().partition(|turn| turn.role == Role::System);

    let system = (!system_turns.is_empty()).then(|| {
        system_turns
            .iter()
            .map(|turn| turn.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    });

    (system, dialogue.into_iter().map(AnthropicMessage::from).collect())
}
