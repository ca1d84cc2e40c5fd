//! Response extraction
//!
//! Walks a provider's non-streaming response and yields one
//! [`CompletionResult`]. Answer and reasoning stay separate; combining them
//! for display is left to callers (see [`crate::quick::render_result`]).

use serde_json::Value;

use crate::error::LlmError;
use crate::normalize::ProviderKind;
use crate::protocol::anthropic::{AnthropicResponse, AnthropicResponseBlock};
use crate::protocol::openai::OpenAiResponse;
use crate::types::CompletionResult;

/// Decoded non-streaming response of either provider
#[derive(Debug, Clone)]
pub enum ProviderResponse {
    /// `OpenAI` chat completion
    OpenAi(OpenAiResponse),
    /// Anthropic message
    Anthropic(AnthropicResponse),
}

impl ProviderResponse {
    /// Decode a raw response body from `provider`
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the body does not have the provider's shape.
    pub fn parse(provider: ProviderKind, body: Value) -> Result<Self, LlmError> {
        let malformed = |e: serde_json::Error| LlmError::MalformedResponse(format!("unexpected {provider} response: {e}"));

        match provider {
            ProviderKind::OpenAi => serde_json::from_value(body).map(Self::OpenAi).map_err(malformed),
            ProviderKind::Anthropic => serde_json::from_value(body).map(Self::Anthropic).map_err(malformed),
        }
    }

    /// Reduce to answer text plus optional reasoning trace
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if no answer text can be found.
    pub fn extract(self) -> Result<CompletionResult, LlmError> {
        match self {
            Self::OpenAi(response) => extract_openai(response),
            Self::Anthropic(response) => extract_anthropic(&response),
        }
    }
}

/// Extract the result from a decoded response
///
/// # Errors
///
/// Returns `MalformedResponse` if no answer text can be found.
pub fn extract(response: ProviderResponse) -> Result<CompletionResult, LlmError> {
    response.extract()
}

/// `choices[0].message.content`; reasoning models keep their trace internal
fn extract_openai(response: OpenAiResponse) -> Result<CompletionResult, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::MalformedResponse("OpenAI response contained no choices".to_owned()))?;

    let content = choice.message.content.ok_or_else(|| {
        LlmError::MalformedResponse(format!(
            "OpenAI choice has no message content (finish_reason: {})",
            choice.finish_reason.as_deref().unwrap_or("none")
        ))
    })?;

    Ok(CompletionResult::answer(content))
}

/// Concatenate `text` blocks into the answer and `thinking` blocks into the trace
fn extract_anthropic(response: &AnthropicResponse) -> Result<CompletionResult, LlmError> {
    let mut answer: Option<String> = None;
    let mut reasoning = String::new();

    for block in &response.content {
        match block {
            AnthropicResponseBlock::Text { text } => answer.get_or_insert_with(String::new).push_str(text),
            AnthropicResponseBlock::Thinking { thinking, .. } => reasoning.push_str(thinking),
            AnthropicResponseBlock::RedactedThinking
            | AnthropicResponseBlock::ToolUse
            | AnthropicResponseBlock::Unknown => {}
        }
    }

    let answer_text = answer.ok_or_else(|| {
        LlmError::MalformedResponse(format!(
            "Anthropic response has no text block (stop_reason: {})",
            response.stop_reason.as_deref().unwrap_or("none")
        ))
    })?;

    Ok(CompletionResult {
        answer_text,
        reasoning_text: (!reasoning.is_empty()).then_some(reasoning),
    })
}
