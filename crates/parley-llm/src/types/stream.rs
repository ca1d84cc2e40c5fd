use serde::{Deserialize, Serialize};

/// Uniform event produced from a vendor stream event
///
/// `Other` marks vendor events with no text payload (keep-alives, block
/// boundaries, metadata). The aggregator never yields it; it exists so
/// per-event classification is total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental answer text
    TextDelta(String),
    /// Incremental reasoning trace text
    ReasoningDelta(String),
    /// Anything without a text payload
    Other,
}

impl StreamEvent {
    /// Answer text carried by this event, if any
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::TextDelta(text) => Some(text),
            Self::ReasoningDelta(_) | Self::Other => None,
        }
    }

    /// Whether this event carries reasoning rather than answer text
    pub const fn is_reasoning(&self) -> bool {
        matches!(self, Self::ReasoningDelta(_))
    }
}
