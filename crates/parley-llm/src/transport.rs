//! HTTP transport over `reqwest`
//!
//! Both vendors speak JSON over POST and stream with server-sent events; they
//! differ only in base URL and authentication headers, which are fixed when
//! the transport is built.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use http::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::dispatch::{RawEventStream, Transport};
use crate::error::LlmError;

/// `reqwest`-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    name: &'static str,
    client: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Transport authenticating with `Authorization: Bearer <key>`
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the key is not a valid header value.
    pub fn openai(base_url: Url, api_key: Option<&SecretString>) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = api_key {
            headers.insert(AUTHORIZATION, secret_header(&format!("Bearer {}", key.expose_secret()))?);
        }

        Ok(Self::new("openai", base_url, headers))
    }

    /// Transport authenticating with `x-api-key` and pinning `anthropic-version`
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the key or version is not a valid header value.
    pub fn anthropic(base_url: Url, api_key: Option<&SecretString>, version: &str) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_str(version)
                .map_err(|e| LlmError::Configuration(format!("invalid anthropic version header: {e}")))?,
        );

        if let Some(key) = api_key {
            headers.insert(HeaderName::from_static("x-api-key"), secret_header(key.expose_secret())?);
        }

        Ok(Self::new("anthropic", base_url, headers))
    }

    fn new(name: &'static str, base_url: Url, headers: HeaderMap) -> Self {
        Self {
            name,
            client: Client::new(),
            base_url,
            headers,
        }
    }

    /// Join `path` onto the base URL
    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }

    /// POST the body and reject non-success statuses
    async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response, LlmError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = self.name, error = %e, "upstream request failed");
                LlmError::transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(provider = self.name, status = %status, "upstream returned error");

        Err(LlmError::Transport {
            status: Some(status.as_u16()),
            message: error_message(&body).unwrap_or_else(|| format!("provider returned {status}: {body}")),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, path: &str, body: Value) -> Result<Value, LlmError> {
        let response = self.post(path, &body).await?;

        response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(format!("failed to decode {} response: {e}", self.name)))
    }

    async fn open_stream(&self, path: &str, body: Value) -> Result<RawEventStream, LlmError> {
        let response = self.post(path, &body).await?;
        let provider = self.name;

        let events = response.bytes_stream().eventsource().map(move |result| match result {
            Ok(event) => Ok(event.data),
            Err(e) => {
                tracing::error!(provider, error = %e, "upstream stream failed");
                Err(LlmError::transport(e.to_string()))
            }
        });

        Ok(Box::pin(events))
    }
}

/// Header value that is redacted from `Debug` output
fn secret_header(value: &str) -> Result<HeaderValue, LlmError> {
    let mut header =
        HeaderValue::from_str(value).map_err(|e| LlmError::Configuration(format!("invalid API key: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Pull `error.message` out of a vendor error body
///
/// Both vendors nest a human-readable message under `error`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToOwned::to_owned)
}
