//! Anthropic chat adapter

use std::sync::Arc;

use parley_config::AnthropicConfig;

use super::ChatAdapter;
use crate::dispatch::Transport;
use crate::error::LlmError;
use crate::normalize::{AnthropicDefaults, ProviderKind, ProviderParams, anthropic};
use crate::transport::HttpTransport;
use crate::types::CompletionRequest;

/// Adapter for the Anthropic Messages API
#[derive(Debug)]
pub struct AnthropicAdapter<T = HttpTransport> {
    transport: Arc<T>,
    defaults: AnthropicDefaults,
}

/// Provider B adapter over HTTP
pub type ChatAdapterB = AnthropicAdapter<HttpTransport>;

impl<T> AnthropicAdapter<T> {
    /// Adapter sending through `transport` with the given injected defaults
    pub fn new(transport: Arc<T>, defaults: AnthropicDefaults) -> Self {
        Self { transport, defaults }
    }

    /// Defaults applied to every request
    pub fn defaults(&self) -> &AnthropicDefaults {
        &self.defaults
    }
}

impl<T> Clone for AnthropicAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            defaults: self.defaults.clone(),
        }
    }
}

impl AnthropicAdapter<HttpTransport> {
    /// Build an HTTP-backed adapter from configuration
    ///
    /// The API key falls back to `ANTHROPIC_API_KEY`.
    pub fn from_config(config: &AnthropicConfig) -> Result<Self, LlmError> {
        let transport = HttpTransport::anthropic(
            config.base_url.clone(),
            config.resolve_api_key().as_ref(),
            &config.version,
        )?;
        let defaults = AnthropicDefaults::from_config(config)?;

        Ok(Self::new(Arc::new(transport), defaults))
    }
}

impl<T: Transport + 'static> ChatAdapter for AnthropicAdapter<T> {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    fn normalize(&self, request: &CompletionRequest) -> Result<ProviderParams, LlmError> {
        anthropic::normalize(request, &self.defaults).map(ProviderParams::Anthropic)
    }
}
