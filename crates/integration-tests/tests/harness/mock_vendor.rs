//! Mock vendor server for integration tests
//!
//! Serves both `/v1/chat/completions` and `/v1/messages` with one canned
//! reply and records every request it receives.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{StreamExt, stream};
use parley_config::{AnthropicConfig, OpenAiConfig};
use secrecy::SecretString;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

pub const OPENAI_KEY: &str = "sk-test-openai";
pub const ANTHROPIC_KEY: &str = "sk-test-anthropic";

/// One server-sent event
#[derive(Debug, Clone)]
pub struct SseEvent {
    event: Option<String>,
    data: String,
}

impl SseEvent {
    /// Unnamed event, as `OpenAI` sends them
    pub fn data(data: impl ToString) -> Self {
        Self {
            event: None,
            data: data.to_string(),
        }
    }

    /// Event named after its payload `type`, as Anthropic sends them
    pub fn typed(payload: &Value) -> Self {
        Self {
            event: payload["type"].as_str().map(ToOwned::to_owned),
            data: payload.to_string(),
        }
    }
}

/// Canned reply for every request
#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON body with status 200
    Json(Value),
    /// Finite SSE stream
    Events(Vec<SseEvent>),
    /// SSE stream that never ends after the given events
    EventsThenHang(Vec<SseEvent>),
    /// Error status with a JSON body
    Status(u16, Value),
}

/// Request as seen by the mock
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct VendorState {
    reply: Reply,
    requests: Mutex<Vec<ReceivedRequest>>,
    stream_closed: Arc<AtomicBool>,
}

/// Mock `OpenAI` and Anthropic endpoints on an ephemeral port
pub struct MockVendor {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<VendorState>,
}

impl MockVendor {
    /// Start the mock server, returning once it is listening
    pub async fn start(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(VendorState {
            reply,
            requests: Mutex::new(Vec::new()),
            stream_closed: Arc::new(AtomicBool::new(false)),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle))
            .route("/v1/messages", routing::post(handle))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including `/v1`
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/v1", self.addr)).expect("valid mock URL")
    }

    /// `OpenAI` configuration pointing at this server
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some(SecretString::from(OPENAI_KEY)),
            base_url: self.base_url(),
            ..OpenAiConfig::default()
        }
    }

    /// Anthropic configuration pointing at this server
    pub fn anthropic_config(&self) -> AnthropicConfig {
        AnthropicConfig {
            api_key: Some(SecretString::from(ANTHROPIC_KEY)),
            base_url: self.base_url(),
            ..AnthropicConfig::default()
        }
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.state.requests.lock().expect("request log poisoned").clone()
    }

    /// Only request received; panics if there was not exactly one
    pub fn single_request(&self) -> ReceivedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }

    /// Wait until the server notices a hanging stream was abandoned
    pub async fn wait_for_stream_close(&self, timeout: Duration) -> bool {
        let closed = Arc::clone(&self.state.stream_closed);
        tokio::time::timeout(timeout, async move {
            while !closed.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .is_ok()
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Flags the body stream as dropped
struct CloseGuard(Arc<AtomicBool>);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn to_event(event: SseEvent) -> Result<Event, Infallible> {
    let sse = Event::default().data(event.data);
    Ok(match event.event {
        Some(name) => sse.event(name),
        None => sse,
    })
}

async fn handle(State(state): State<Arc<VendorState>>, uri: Uri, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.requests.lock().expect("request log poisoned").push(ReceivedRequest {
        path: uri.path().to_owned(),
        headers,
        body,
    });

    match &state.reply {
        Reply::Json(body) => Json(body.clone()).into_response(),
        Reply::Status(status, body) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body.clone())).into_response()
        }
        Reply::Events(events) => Sse::new(stream::iter(events.clone()).map(to_event)).into_response(),
        Reply::EventsThenHang(events) => {
            let guard = CloseGuard(Arc::clone(&state.stream_closed));
            let events = stream::iter(events.clone()).chain(stream::pending()).map(move |event| {
                let _held = &guard;
                to_event(event)
            });

            // Keep-alive writes surface the closed connection
            Sse::new(events)
                .keep_alive(KeepAlive::new().interval(Duration::from_millis(20)))
                .into_response()
        }
    }
}
