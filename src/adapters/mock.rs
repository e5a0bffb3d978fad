//! Scripted test doubles for the trait seams.
//!
//! `MockHttpClient` serves canned responses per URL and can deliver bodies
//! in arbitrary chunks, fail mid-body, or stall forever. It also tracks
//! how many streamed bodies are still alive, so tests can check that every
//! exit path releases the response. `RecordingEvents` captures callbacks.

use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};

use crate::traits::{
    ByteStream, ChatEvents, Headers, HttpClient, HttpError, Response, StreamResponse,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Canned outcome for one request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Whole response delivered at once
    Success(Response),
    /// Body delivered chunk by chunk; an `Err` item is a failed read
    Chunked {
        status: u16,
        chunks: Vec<Result<Bytes, HttpError>>,
    },
    /// Chunks delivered, then the body never ends
    Stalled { status: u16, chunks: Vec<Bytes> },
    /// Request fails before any response arrives
    Error(HttpError),
}

impl MockResponse {
    /// JSON body with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(value.to_string())))
    }

    /// Plain text body with the given status.
    pub fn text(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    /// 200 response streaming `chunks` in order.
    pub fn sse<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        MockResponse::Chunked {
            status: 200,
            chunks: chunks.into_iter().map(|c| Ok(c.into())).collect(),
        }
    }
}

/// One request as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
    pub headers: Headers,
}

/// Body wrapper decrementing the open-body counter when dropped.
struct TrackedBody {
    inner: ByteStream,
    open: Arc<AtomicUsize>,
}

impl Stream for TrackedBody {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scripted HttpClient.
///
/// Responses queued for a URL are served once each, in order; the last one
/// queued keeps being served. URLs without a script get the default
/// response, or a 404 when none is set.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    default_response: Mutex<Option<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    open_bodies: Arc<AtomicUsize>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the script for `url` with a single response.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), VecDeque::from([response]));
    }

    /// Append a response to the script for `url`.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses)
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Response for URLs without a script.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Requests received for `url`.
    pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }

    /// Streamed bodies handed out and not dropped yet.
    pub fn open_bodies(&self) -> usize {
        self.open_bodies.load(Ordering::SeqCst)
    }

    fn record(&self, method: &'static str, url: &str, body: Option<&str>, headers: &Headers) {
        lock(&self.requests).push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.map(String::from),
            headers: headers.clone(),
        });
    }

    fn next_response(&self, url: &str) -> MockResponse {
        let mut responses = lock(&self.responses);
        if let Some(queue) = responses.get_mut(url) {
            if queue.len() > 1 {
                if let Some(response) = queue.pop_front() {
                    return response;
                }
            } else if let Some(response) = queue.front() {
                return response.clone();
            }
        }
        drop(responses);

        lock(&self.default_response)
            .clone()
            .unwrap_or_else(|| MockResponse::text(404, "Not Found"))
    }

    fn buffered(response: MockResponse) -> Result<Response, HttpError> {
        match response {
            MockResponse::Success(response) => Ok(response),
            MockResponse::Chunked { status, chunks } => {
                let mut body = Vec::new();
                for chunk in chunks {
                    body.extend_from_slice(&chunk?);
                }
                Ok(Response::new(status, Bytes::from(body)))
            }
            MockResponse::Stalled { .. } => Err(HttpError::Timeout("mock body stalled".to_string())),
            MockResponse::Error(err) => Err(err),
        }
    }

    fn streamed(&self, response: MockResponse) -> Result<StreamResponse, HttpError> {
        let status = match &response {
            MockResponse::Success(response) => response.status,
            MockResponse::Chunked { status, .. } | MockResponse::Stalled { status, .. } => *status,
            MockResponse::Error(err) => return Err(err.clone()),
        };
        let body: ByteStream = match response {
            MockResponse::Success(response) => {
                Box::pin(stream::iter(vec![Ok::<Bytes, HttpError>(response.body)]))
            }
            MockResponse::Chunked { chunks, .. } => Box::pin(stream::iter(chunks)),
            MockResponse::Stalled { chunks, .. } => Box::pin(
                stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
                    .chain(stream::pending()),
            ),
            MockResponse::Error(err) => return Err(err),
        };

        self.open_bodies.fetch_add(1, Ordering::SeqCst);
        let body = TrackedBody {
            inner: body,
            open: Arc::clone(&self.open_bodies),
        };
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map(String::from);
        Ok(StreamResponse::new(status, reason, Box::pin(body)))
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("GET", url, None, headers);
        Self::buffered(self.next_response(url))
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("POST", url, Some(body), headers);
        Self::buffered(self.next_response(url))
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        self.record("POST", url, Some(body), headers);
        let response = self.next_response(url);
        self.streamed(response)
    }
}

/// One ChatEvents callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    UserMessage(String),
    TokenAppended(String),
    Finalized(String),
    Error(String),
    Withdrawn,
    Reset,
}

/// ChatEvents implementation that records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<RecordedEvent> {
        lock(&self.events).clone()
    }

    /// Messages passed to `on_error`.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    fn push(&self, event: RecordedEvent) {
        lock(&self.events).push(event);
    }
}

impl ChatEvents for RecordingEvents {
    fn on_user_message(&self, text: &str) {
        self.push(RecordedEvent::UserMessage(text.to_string()));
    }

    fn on_assistant_token_appended(&self, partial_text: &str) {
        self.push(RecordedEvent::TokenAppended(partial_text.to_string()));
    }

    fn on_assistant_message_finalized(&self, full_text: &str) {
        self.push(RecordedEvent::Finalized(full_text.to_string()));
    }

    fn on_error(&self, message: &str) {
        self.push(RecordedEvent::Error(message.to_string()));
    }

    fn on_assistant_message_withdrawn(&self) {
        self.push(RecordedEvent::Withdrawn);
    }

    fn on_conversation_reset(&self) {
        self.push(RecordedEvent::Reset);
    }
}
