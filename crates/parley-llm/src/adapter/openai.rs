//! `OpenAI` chat adapter

use std::sync::Arc;

use parley_config::OpenAiConfig;

use super::ChatAdapter;
use crate::dispatch::Transport;
use crate::error::LlmError;
use crate::normalize::{OpenAiDefaults, ProviderKind, ProviderParams, openai};
use crate::transport::HttpTransport;
use crate::types::CompletionRequest;

/// Adapter for the `OpenAI` Chat Completions API
#[derive(Debug)]
pub struct OpenAiAdapter<T = HttpTransport> {
    transport: Arc<T>,
    defaults: OpenAiDefaults,
}

/// Provider A adapter over HTTP
pub type ChatAdapterA = OpenAiAdapter<HttpTransport>;

impl<T> OpenAiAdapter<T> {
    /// Adapter sending through `transport` with the given injected defaults
    pub fn new(transport: Arc<T>, defaults: OpenAiDefaults) -> Self {
        Self { transport, defaults }
    }

    /// Defaults applied to every request
    pub fn defaults(&self) -> &OpenAiDefaults {
        &self.defaults
    }
}

impl<T> Clone for OpenAiAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            defaults: self.defaults.clone(),
        }
    }
}

impl OpenAiAdapter<HttpTransport> {
    /// Build an HTTP-backed adapter from configuration
    ///
    /// The API key falls back to `OPENAI_API_KEY`.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, LlmError> {
        let transport = HttpTransport::openai(config.base_url.clone(), config.resolve_api_key().as_ref())?;
        Ok(Self::new(Arc::new(transport), OpenAiDefaults::from(config)))
    }
}

impl<T: Transport + 'static> ChatAdapter for OpenAiAdapter<T> {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    fn normalize(&self, request: &CompletionRequest) -> Result<ProviderParams, LlmError> {
        openai::normalize(request, &self.defaults).map(ProviderParams::OpenAi)
    }
}
