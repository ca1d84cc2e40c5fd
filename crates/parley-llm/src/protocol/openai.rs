//! `OpenAI` Chat Completions wire format types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Endpoint path relative to the API base URL
pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Stream terminator sent as the final SSE `data:` payload
pub const DONE_SENTINEL: &str = "[DONE]";

// -- Request types --

/// `OpenAI` chat completion request
///
/// Optional parameters are omitted from the JSON entirely when unset; some
/// compatible backends reject explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<OpenAiMessage>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Token limit understood by reasoning models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    /// Whether to stream the response
    pub stream: bool,
    /// Caller-supplied extras
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys owned by normalization; extras using them are discarded
pub const RESERVED_KEYS: &[&str] = &[
    "model",
    "messages",
    "temperature",
    "max_tokens",
    "max_completion_tokens",
    "stream",
];

/// `OpenAI` message within a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiMessage {
    /// Message role
    pub role: String,
    /// Text content
    pub content: String,
}

// -- Response types --

/// `OpenAI` chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Completion choices
    pub choices: Vec<OpenAiChoice>,
}

/// A single choice in a completion response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Generated message
    pub message: OpenAiChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message within a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoiceMessage {
    /// Role (always "assistant")
    #[serde(default)]
    pub role: Option<String>,
    /// Text content, null for tool calls and refusals
    #[serde(default)]
    pub content: Option<String>,
}

// -- Streaming types --

/// One `chat.completion.chunk` SSE payload
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamChunk {
    /// Chunk identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Streaming choices; empty on usage-only chunks, absent on error payloads
    #[serde(default)]
    pub choices: Option<Vec<OpenAiStreamChoice>>,
    /// Error reported in place of a chunk
    #[serde(default)]
    pub error: Option<OpenAiStreamError>,
}

/// Error object sent mid-stream
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamError {
    /// Human-readable message
    pub message: String,
    /// Error category, e.g. `server_error`
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Incremental delta
    #[serde(default)]
    pub delta: OpenAiStreamDelta,
    /// Why generation stopped (final chunk only)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental message delta
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamDelta {
    /// Role (first chunk only)
    #[serde(default)]
    pub role: Option<String>,
    /// Text fragment; absent or null on keep-alive chunks
    #[serde(default)]
    pub content: Option<String>,
    /// Reasoning fragment sent by reasoning-capable compatible backends
    #[serde(default)]
    pub reasoning_content: Option<String>,
}
