//! Anthropic Messages API wire format types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Endpoint path relative to the API base URL
pub const MESSAGES_PATH: &str = "messages";

// -- Request types --

/// Anthropic messages API request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicRequest {
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate (required by Anthropic)
    pub max_tokens: u32,
    /// System prompt (top-level, not in messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Conversation messages, user and assistant only
    pub messages: Vec<AnthropicMessage>,
    /// Sampling temperature (always sent)
    pub temperature: f64,
    /// Whether to stream the response
    pub stream: bool,
    /// Extended thinking configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<AnthropicThinking>,
    /// Caller-supplied extras
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys owned by normalization; extras using them are discarded
pub const RESERVED_KEYS: &[&str] = &[
    "model",
    "max_tokens",
    "system",
    "messages",
    "temperature",
    "stream",
    "thinking",
];

/// Anthropic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role ("user" or "assistant")
    pub role: String,
    /// Text content
    pub content: String,
}

/// Extended thinking block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicThinking {
    /// Thinking enabled with a token budget
    Enabled {
        /// Tokens the model may spend thinking
        budget_tokens: u32,
    },
}

// -- Response types --

/// Anthropic messages API response
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Response content blocks
    pub content: Vec<AnthropicResponseBlock>,
    /// Stop reason
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Content block in an Anthropic response
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicResponseBlock {
    /// Answer text
    Text {
        /// The text string
        text: String,
    },
    /// Visible reasoning trace
    Thinking {
        /// Reasoning text
        thinking: String,
        /// Verification signature
        #[serde(default)]
        signature: Option<String>,
    },
    /// Encrypted reasoning, never surfaced
    RedactedThinking,
    /// Tool use request
    ToolUse,
    /// Block types this layer does not know about
    #[serde(other)]
    Unknown,
}

// -- Streaming types --

/// Anthropic SSE event types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamEvent {
    /// Stream started
    MessageStart {
        /// Partial message with metadata
        message: AnthropicStreamMessage,
    },
    /// New content block started
    ContentBlockStart {
        /// Block index
        index: u32,
    },
    /// Incremental content within a block
    ContentBlockDelta {
        /// Block index
        index: u32,
        /// Delta content
        delta: AnthropicStreamDelta,
    },
    /// Content block finished
    ContentBlockStop {
        /// Block index
        index: u32,
    },
    /// Message metadata delta (stop reason, usage)
    MessageDelta {
        /// Delta with stop reason
        delta: AnthropicMessageDelta,
    },
    /// Stream completed
    MessageStop,
    /// Ping event for keep-alive
    Ping,
    /// Error reported mid-stream
    Error {
        /// Error details
        error: AnthropicErrorDetail,
    },
    /// Event types this layer does not know about
    #[serde(other)]
    Unknown,
}

/// Partial message in a `message_start` event
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicStreamMessage {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model
    #[serde(default)]
    pub model: Option<String>,
}

/// Delta content in a `content_block_delta` event
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamDelta {
    /// Incremental answer text
    TextDelta {
        /// Text fragment
        text: String,
    },
    /// Incremental reasoning text
    ThinkingDelta {
        /// Reasoning fragment
        thinking: String,
    },
    /// Signature for the thinking block
    SignatureDelta,
    /// Incremental tool input JSON
    InputJsonDelta,
    /// Delta types this layer does not know about
    #[serde(other)]
    Unknown,
}

/// Delta in a `message_delta` event
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicMessageDelta {
    /// Stop reason
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Anthropic error detail
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicErrorDetail {
    /// Error type (e.g. `overloaded_error`)
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
}
