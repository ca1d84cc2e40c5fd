//! Request dispatch
//!
//! Hands normalized parameters to a [`Transport`] and selects the one-shot or
//! streaming call from the parameters' `stream` flag. No retries, no backoff:
//! a transport failure is returned as is.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde_json::Value;

use crate::error::LlmError;
use crate::normalize::ProviderParams;

/// Raw SSE `data:` payloads in arrival order
///
/// Dropping the stream releases the underlying connection.
pub type RawEventStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Opaque vendor call, one per provider endpoint family
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `path` and return the decoded JSON response
    async fn send(&self, path: &str, body: Value) -> Result<Value, LlmError>;

    /// POST `body` to `path` and subscribe to the resulting event stream
    async fn open_stream(&self, path: &str, body: Value) -> Result<RawEventStream, LlmError>;
}

/// Outcome of a dispatch
pub enum Dispatched {
    /// Complete response body
    Complete(Value),
    /// Lazy event sequence
    Stream(RawEventStream),
}

impl std::fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(body) => f.debug_tuple("Complete").field(body).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Send `params` through `transport`
pub async fn dispatch<T>(transport: &T, params: &ProviderParams) -> Result<Dispatched, LlmError>
where
    T: Transport + ?Sized,
{
    let body = params.to_body()?;

    tracing::debug!(
        provider = %params.provider(),
        model = params.model(),
        stream = params.is_stream(),
        "dispatching completion request"
    );

    if params.is_stream() {
        transport.open_stream(params.path(), body).await.map(Dispatched::Stream)
    } else {
        transport.send(params.path(), body).await.map(Dispatched::Complete)
    }
}
