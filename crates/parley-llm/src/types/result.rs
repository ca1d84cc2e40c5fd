use serde::{Deserialize, Serialize};

/// Outcome of a non-streaming completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Final answer text
    pub answer_text: String,
    /// Visible reasoning trace, present only when the provider returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_text: Option<String>,
}

impl CompletionResult {
    /// Result carrying only an answer
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer_text: text.into(),
            reasoning_text: None,
        }
    }
}
