use thiserror::Error;

/// Errors surfaced by the completion layer
///
/// Nothing here is retried or suppressed internally; every variant reaches the
/// immediate caller.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network, authentication, or rate-limit failure from the vendor call
    #[error("transport error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport {
        /// HTTP status, when the vendor answered at all
        status: Option<u16>,
        /// Vendor or client error message
        message: String,
    },

    /// Requested parameters have no valid mapping for the provider/model
    #[error("unsupported parameter combination: {0}")]
    UnsupportedParameterCombination(String),

    /// Response or stream event lacks fields this layer depends on
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Adapter could not be built from the supplied settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Build a transport error without a status code
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Whether a caller-side retry has a reasonable chance of succeeding
    ///
    /// Connection failures, timeouts, conflicts, rate limits, and server
    /// errors are transient. Everything else will fail the same way again.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(status), ..
            } => matches!(*status, 408 | 409 | 429) || *status >= 500,
            Self::UnsupportedParameterCombination(_)
            | Self::MalformedResponse(_)
            | Self::Configuration(_)
            | Self::Internal(_) => false,
        }
    }
}
