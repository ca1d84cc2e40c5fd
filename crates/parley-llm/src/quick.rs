//! One-shot helpers
//!
//! Build an adapter from default configuration, send one user turn and return
//! the result. Credentials come from the usual environment variables.

use futures_util::TryStreamExt;
use parley_config::Config;

use crate::adapter::{AnthropicAdapter, ChatAdapter, OpenAiAdapter};
use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResult, StreamEvent};

/// Send `prompt` as a single user turn through `adapter`
///
/// With `stream` set the reply is read as a stream and its deltas are
/// accumulated; reasoning deltas collect into `reasoning_text`.
pub async fn quick_chat<A>(adapter: &A, prompt: &str, reasoning: bool, stream: bool) -> Result<CompletionResult, LlmError>
where
    A: ChatAdapter + ?Sized,
{
    let request = CompletionRequest::user(prompt).with_reasoning(reasoning);
    if !stream {
        return adapter.complete(&request).await;
    }

    let (answer, thought) = adapter
        .complete_stream(&request)
        .await?
        .try_fold((String::new(), String::new()), |(mut answer, mut thought), event| async move {
            match event {
                StreamEvent::TextDelta(text) => answer.push_str(&text),
                StreamEvent::ReasoningDelta(text) => thought.push_str(&text),
                StreamEvent::Other => {}
            }
            Ok((answer, thought))
        })
        .await?;

    Ok(CompletionResult {
        answer_text: answer,
        reasoning_text: (!thought.is_empty()).then_some(thought),
    })
}

/// One-shot `OpenAI` completion with default settings
pub async fn quick_openai_chat(prompt: &str, reasoning: bool, stream: bool) -> Result<CompletionResult, LlmError> {
    let adapter = OpenAiAdapter::from_config(&Config::default().openai)?;
    quick_chat(&adapter, prompt, reasoning, stream).await
}

/// One-shot Anthropic completion with default settings
pub async fn quick_anthropic_chat(prompt: &str, reasoning: bool, stream: bool) -> Result<CompletionResult, LlmError> {
    let adapter = AnthropicAdapter::from_config(&Config::default().anthropic)?;
    quick_chat(&adapter, prompt, reasoning, stream).await
}

/// Human-readable rendering, reasoning first when present
pub fn render_result(result: &CompletionResult) -> String {
    match result.reasoning_text.as_deref() {
        Some(reasoning) => format!("[REASONING]: {reasoning}\n\n[ANSWER]: {}", result.answer_text),
        None => result.answer_text.clone(),
    }
}
