//! Chat adapters
//!
//! One adapter per provider, each holding an immutable transport and its
//! injected defaults. Every call normalizes, dispatches and then extracts or
//! aggregates; adapters keep no state between calls and are shared freely
//! across tasks.

pub mod anthropic;
pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt, future};

pub use self::anthropic::{AnthropicAdapter, ChatAdapterB};
pub use self::openai::{ChatAdapterA, OpenAiAdapter};
use crate::aggregate::{EventStream, aggregate};
use crate::dispatch::{Dispatched, Transport, dispatch};
use crate::error::LlmError;
use crate::extract::ProviderResponse;
use crate::normalize::{ProviderKind, ProviderParams};
use crate::types::{CompletionRequest, CompletionResult};

/// Answer text deltas only
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Provider-agnostic chat completion facade
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Provider this adapter talks to
    fn provider(&self) -> ProviderKind;

    /// Transport used for vendor calls
    fn transport(&self) -> &dyn Transport;

    /// Provider parameters for `request`, without sending anything
    fn normalize(&self, request: &CompletionRequest) -> Result<ProviderParams, LlmError>;

    /// Run a non-streaming completion
    ///
    /// The request's `stream` flag is ignored.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LlmError> {
        let params = self.normalize(request)?.with_stream(false);

        let body = match dispatch(self.transport(), &params).await? {
            Dispatched::Complete(body) => body,
            Dispatched::Stream(_) => {
                return Err(LlmError::Internal(anyhow::anyhow!(
                    "{} transport opened a stream for a non-streaming call",
                    self.provider()
                )));
            }
        };

        ProviderResponse::parse(self.provider(), body)?.extract()
    }

    /// Run a streaming completion, keeping reasoning deltas
    ///
    /// The request's `stream` flag is ignored.
    async fn complete_stream(&self, request: &CompletionRequest) -> Result<EventStream, LlmError> {
        let params = self.normalize(request)?.with_stream(true);

        match dispatch(self.transport(), &params).await? {
            Dispatched::Stream(raw) => Ok(aggregate(self.provider(), raw)),
            Dispatched::Complete(_) => Err(LlmError::Internal(anyhow::anyhow!(
                "{} transport returned a complete body for a streaming call",
                self.provider()
            ))),
        }
    }

    /// Run a streaming completion yielding answer text only
    async fn complete_text_stream(&self, request: &CompletionRequest) -> Result<TextStream, LlmError> {
        let events = self.complete_stream(request).await?;
        Ok(text_only(events))
    }
}

/// Drop everything but answer text from an event stream
pub fn text_only(events: EventStream) -> TextStream {
    Box::pin(events.filter_map(|item| {
        future::ready(match item {
            Ok(event) => event.into_text().map(Ok),
            Err(e) => Some(Err(e)),
        })
    }))
}
