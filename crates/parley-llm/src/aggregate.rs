//! Stream aggregation
//!
//! Converts a provider's raw event sequence into uniform [`StreamEvent`]s.
//! Each vendor event is classified on its own and emitted immediately, so
//! output order equals arrival order and nothing is buffered. Events without a
//! text payload are dropped. The output ends when the input ends; no closing
//! sentinel is synthesized. The first error ends the sequence.

use std::pin::Pin;

use futures_util::{Stream, StreamExt, future};

use crate::dispatch::RawEventStream;
use crate::error::LlmError;
use crate::normalize::ProviderKind;
use crate::protocol::anthropic::{AnthropicStreamDelta, AnthropicStreamEvent};
use crate::protocol::openai::{DONE_SENTINEL, OpenAiStreamChunk};
use crate::types::StreamEvent;

/// Uniform event stream handed to callers
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Aggregate a raw event sequence from `provider`
pub fn aggregate(provider: ProviderKind, raw: RawEventStream) -> EventStream {
    match provider {
        ProviderKind::OpenAi => aggregate_openai(raw),
        ProviderKind::Anthropic => aggregate_anthropic(raw),
    }
}

/// Aggregate an `OpenAI` chunk stream, stopping at `[DONE]`
pub fn aggregate_openai(raw: RawEventStream) -> EventStream {
    let until_done = raw.take_while(|item| {
        let done = matches!(item, Ok(data) if data.trim() == DONE_SENTINEL);
        future::ready(!done)
    });

    classify_each(until_done, decode_openai)
}

/// Aggregate an Anthropic event stream
pub fn aggregate_anthropic(raw: RawEventStream) -> EventStream {
    classify_each(raw, decode_anthropic)
}

/// Classify one `OpenAI` chunk
///
/// Only `choices[0].delta` matters. `content` wins over `reasoning_content`;
/// a chunk with neither (role-only, finish, keep-alive) or with an empty
/// `choices` list (usage-only) classifies as `Other`.
///
/// # Errors
///
/// An `error` payload becomes a `Transport` error; a payload with no
/// `choices` at all is `MalformedResponse`.
pub fn openai_chunk_event(chunk: &OpenAiStreamChunk) -> Result<StreamEvent, LlmError> {
    if let Some(error) = &chunk.error {
        return Err(LlmError::transport(match &error.error_type {
            Some(kind) => format!("{kind}: {}", error.message),
            None => error.message.clone(),
        }));
    }

    let choices = chunk
        .choices
        .as_deref()
        .ok_or_else(|| LlmError::MalformedResponse("OpenAI stream chunk has no choices".to_owned()))?;

    let Some(delta) = choices.first().map(|choice| &choice.delta) else {
        return Ok(StreamEvent::Other);
    };

    Ok(match (&delta.content, &delta.reasoning_content) {
        (Some(text), _) => StreamEvent::TextDelta(text.clone()),
        (None, Some(reasoning)) => StreamEvent::ReasoningDelta(reasoning.clone()),
        (None, None) => StreamEvent::Other,
    })
}

/// Classify one Anthropic event
///
/// # Errors
///
/// A vendor `error` event becomes a `Transport` error.
pub fn anthropic_event(event: &AnthropicStreamEvent) -> Result<StreamEvent, LlmError> {
    let classified = match event {
        AnthropicStreamEvent::ContentBlockDelta { delta, .. } => match delta {
            AnthropicStreamDelta::TextDelta { text } => StreamEvent::TextDelta(text.clone()),
            AnthropicStreamDelta::ThinkingDelta { thinking } => StreamEvent::ReasoningDelta(thinking.clone()),
            AnthropicStreamDelta::SignatureDelta
            | AnthropicStreamDelta::InputJsonDelta
            | AnthropicStreamDelta::Unknown => StreamEvent::Other,
        },
        AnthropicStreamEvent::MessageStart { message } => {
            tracing::trace!(id = ?message.id, model = ?message.model, "anthropic stream started");
            StreamEvent::Other
        }
        AnthropicStreamEvent::MessageDelta { delta } => {
            tracing::trace!(stop_reason = ?delta.stop_reason, "anthropic message delta");
            StreamEvent::Other
        }
        AnthropicStreamEvent::Error { error } => {
            return Err(LlmError::transport(format!("{}: {}", error.error_type, error.message)));
        }
        AnthropicStreamEvent::ContentBlockStart { .. }
        | AnthropicStreamEvent::ContentBlockStop { .. }
        | AnthropicStreamEvent::MessageStop
        | AnthropicStreamEvent::Ping
        | AnthropicStreamEvent::Unknown => StreamEvent::Other,
    };

    Ok(classified)
}

fn decode_openai(data: &str) -> Result<StreamEvent, LlmError> {
    if data.trim().is_empty() {
        return Ok(StreamEvent::Other);
    }

    let chunk: OpenAiStreamChunk = serde_json::from_str(data)
        .map_err(|e| LlmError::MalformedResponse(format!("undecodable OpenAI stream chunk: {e}")))?;

    openai_chunk_event(&chunk)
}

fn decode_anthropic(data: &str) -> Result<StreamEvent, LlmError> {
    if data.trim().is_empty() {
        return Ok(StreamEvent::Other);
    }

    let event: AnthropicStreamEvent = serde_json::from_str(data)
        .map_err(|e| LlmError::MalformedResponse(format!("undecodable Anthropic stream event: {e}")))?;

    anthropic_event(&event)
}

/// Map payloads through `decode`, drop `Other`, and stop after the first error
fn classify_each<S>(raw: S, decode: fn(&str) -> Result<StreamEvent, LlmError>) -> EventStream
where
    S: Stream<Item = Result<String, LlmError>> + Send + 'static,
{
    let events = raw
        .filter_map(move |item| {
            let event = item.and_then(|data| decode(&data));
            future::ready(match event {
                Ok(StreamEvent::Other) => {
                    tracing::trace!("dropping stream event without text payload");
                    None
                }
                other => Some(other),
            })
        })
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        });

    Box::pin(events)
}
