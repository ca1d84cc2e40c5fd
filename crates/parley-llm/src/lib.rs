//! Unified chat completions over `OpenAI` and Anthropic
//!
//! A provider-agnostic [`CompletionRequest`] is normalized into each vendor's
//! wire parameters, dispatched through a [`Transport`], and the vendor's reply
//! is reduced to a [`CompletionResult`] or a stream of tagged
//! [`StreamEvent`]s. The [`ChatAdapter`] implementations tie the stages
//! together; the stages are public for callers that need them separately.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod aggregate;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod protocol;
pub mod quick;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use adapter::{AnthropicAdapter, ChatAdapter, ChatAdapterA, ChatAdapterB, OpenAiAdapter, TextStream};
pub use aggregate::{EventStream, aggregate};
pub use dispatch::{Dispatched, RawEventStream, Transport, dispatch};
pub use error::LlmError;
pub use extract::{ProviderResponse, extract};
pub use normalize::{AnthropicDefaults, OpenAiDefaults, ProviderDefaults, ProviderKind, ProviderParams, normalize};
pub use quick::{quick_anthropic_chat, quick_openai_chat, render_result};
pub use transport::HttpTransport;
pub use types::{CompletionRequest, CompletionResult, Conversation, ConversationTurn, Role, StreamEvent};
