//! `OpenAI` parameter normalization
//!
//! Reasoning on this provider is a separate model family. Requesting it swaps
//! the model for the configured reasoning model, whatever the caller asked
//! for, and strips `temperature`, which those models reject.

use parley_config::OpenAiConfig;

use crate::error::LlmError;
use crate::protocol::openai::{OpenAiMessage, OpenAiRequest, RESERVED_KEYS};
use crate::types::{CompletionRequest, ConversationTurn};

/// Defaults injected into `OpenAI` normalization
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiDefaults {
    /// Model used when the request names none
    pub model: String,
    /// Reasoning-family model; `None` means reasoning is unsupported
    pub reasoning_model: Option<String>,
    /// Temperature used when the request names none; `None` omits it
    pub temperature: Option<f64>,
}

impl Default for OpenAiDefaults {
    fn default() -> Self {
        Self::from(&OpenAiConfig::default())
    }
}

impl From<&OpenAiConfig> for OpenAiDefaults {
    fn from(config: &OpenAiConfig) -> Self {
        Self {
            model: config.model.clone(),
            reasoning_model: config.reasoning_model().map(ToOwned::to_owned),
            temperature: config.temperature,
        }
    }
}

impl From<&ConversationTurn> for OpenAiMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role.as_str().to_owned(),
            content: turn.content.clone(),
        }
    }
}

/// Build the `OpenAI` wire request for `request`
///
/// # Errors
///
/// Returns `UnsupportedParameterCombination` when reasoning is requested but
/// no reasoning model is configured.
pub fn normalize(request: &CompletionRequest, defaults: &OpenAiDefaults) -> Result<OpenAiRequest, LlmError> {
    let messages = request.conversation.iter().map(OpenAiMessage::from).collect();
    let extra = super::passthrough_extras(&request.extra, RESERVED_KEYS);

    if request.reasoning_enabled {
        let Some(reasoning_model) = defaults.reasoning_model.as_deref() else {
            return Err(LlmError::UnsupportedParameterCombination(format!(
                "reasoning requested for model '{}' but no OpenAI reasoning model is configured",
                request.model.as_deref().unwrap_or(&defaults.model)
            )));
        };

        if let Some(requested) = request.model.as_deref()
            && requested != reasoning_model
        {
            tracing::info!(
                requested,
                substituted = reasoning_model,
                "reasoning requested, substituting reasoning model"
            );
        }

        return Ok(OpenAiRequest {
            model: reasoning_model.to_owned(),
            messages,
            temperature: None,
            max_tokens: None,
            max_completion_tokens: request.max_tokens,
            stream: request.stream,
            extra,
        });
    }

    Ok(OpenAiRequest {
        model: request.model.clone().unwrap_or_else(|| defaults.model.clone()),
        messages,
        temperature: request.temperature.or(defaults.temperature),
        max_tokens: request.max_tokens,
        max_completion_tokens: None,
        stream: request.stream,
        extra,
    })
}
