//! In-memory transport for unit tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;

use crate::dispatch::{RawEventStream, Transport};
use crate::error::LlmError;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub body: Value,
    pub stream: bool,
}

enum Reply {
    Body(Value),
    Events(Vec<Result<String, String>>),
    Fail { status: u16, message: String },
}

/// Replays a canned reply and records every call
pub struct MockTransport {
    reply: Reply,
    calls: Mutex<Vec<RecordedCall>>,
    released: Arc<AtomicBool>,
}

struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl MockTransport {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn responding(body: Value) -> Self {
        Self::with_reply(Reply::Body(body))
    }

    pub fn streaming<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_reply(Reply::Events(payloads.into_iter().map(|p| Ok(p.into())).collect()))
    }

    /// Stream whose `Err` items become mid-stream transport failures
    pub fn streaming_results(items: Vec<Result<&str, &str>>) -> Self {
        Self::with_reply(Reply::Events(
            items
                .into_iter()
                .map(|item| item.map(ToOwned::to_owned).map_err(ToOwned::to_owned))
                .collect(),
        ))
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::with_reply(Reply::Fail {
            status,
            message: message.to_owned(),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether the last opened stream has been dropped
    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn record(&self, path: &str, body: Value, stream: bool) {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_owned(),
            body,
            stream,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, path: &str, body: Value) -> Result<Value, LlmError> {
        self.record(path, body, false);
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Events(_) => panic!("mock configured for streaming"),
            Reply::Fail { status, message } => Err(LlmError::Transport {
                status: Some(*status),
                message: message.clone(),
            }),
        }
    }

    async fn open_stream(&self, path: &str, body: Value) -> Result<RawEventStream, LlmError> {
        self.record(path, body, true);
        match &self.reply {
            Reply::Body(_) => panic!("mock configured for a single response"),
            Reply::Events(items) => {
                self.released.store(false, Ordering::SeqCst);
                let guard = ReleaseGuard(Arc::clone(&self.released));
                let items: Vec<Result<String, LlmError>> =
                    items.iter().cloned().map(|item| item.map_err(LlmError::transport)).collect();

                let stream = futures_util::stream::iter(items).map(move |item| {
                    let _held = &guard;
                    item
                });
                Ok(Box::pin(stream))
            }
            Reply::Fail { status, message } => Err(LlmError::Transport {
                status: Some(*status),
                message: message.clone(),
            }),
        }
    }
}
