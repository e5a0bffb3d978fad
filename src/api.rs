//! Chat backend API client.
//!
//! Thin layer over [`HttpClient`] for the three endpoints the chat backend
//! exposes: session creation, the streaming chat turn, and a health probe.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::traits::{ByteStream, Headers, HttpClient};

/// Opaque conversation id handed out by `POST /session`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub session_id: SessionId,
    pub message: String,
}

impl ChatRequest {
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_id: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Number of sessions the backend currently holds
    #[serde(default)]
    pub sessions: u64,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Pick the message for a failed response.
///
/// Uses the `detail` field of a JSON body when there is one (non-string
/// details are rendered as JSON), then the reason phrase, then the bare
/// status code.
pub fn error_detail(status: u16, reason: Option<&str>, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => reason
            .filter(|r| !r.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {}", status)),
        Some(other) => other.to_string(),
    }
}

/// Client for the chat backend endpoints.
pub struct ChatApi<C: ?Sized> {
    config: ClientConfig,
    http: Arc<C>,
}

impl<C: HttpClient + ?Sized> ChatApi<C> {
    pub fn new(http: Arc<C>, config: ClientConfig) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask the backend for a fresh session id.
    pub async fn create_session(&self) -> ChatResult<SessionId> {
        let url = self.config.endpoint("/session");
        tracing::debug!(%url, "Creating session");

        let response = self.http.post(&url, "", &Headers::new()).await?;
        if !response.is_success() {
            let reason = reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason());
            return Err(ChatError::SessionUnavailable {
                message: error_detail(response.status, reason, &response.body),
            });
        }

        let body: SessionResponse = response.json().map_err(|e| ChatError::SessionUnavailable {
            message: format!("invalid session response: {}", e),
        })?;
        if body.session_id.is_empty() {
            return Err(ChatError::SessionUnavailable {
                message: "server returned an empty session id".to_string(),
            });
        }
        Ok(SessionId(body.session_id))
    }

    /// Send a chat turn and hand back the SSE body once the status is known.
    ///
    /// A non-2xx status becomes `RequestFailed`; its body is read whole for
    /// the error detail and never treated as a stream. Failing to get any
    /// response at all is `StreamTerminatedAbnormally`.
    pub async fn open_chat(&self, request: &ChatRequest) -> ChatResult<ByteStream> {
        let url = self.config.endpoint("/chat");
        let body = serde_json::to_string(request).map_err(|e| {
            ChatError::StreamTerminatedAbnormally {
                reason: format!("could not encode request: {}", e),
            }
        })?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!(%url, session_id = %request.session_id, "Opening chat stream");
        let response = self
            .http
            .post_stream(&url, &body, &headers)
            .await
            .map_err(|e| ChatError::StreamTerminatedAbnormally {
                reason: e.to_string(),
            })?;

        if response.is_success() {
            return Ok(response.body);
        }

        let status = response.status;
        let reason = response.reason.clone();
        let message = match response.collect_body().await {
            Ok(bytes) => error_detail(status, reason.as_deref(), &bytes),
            Err(e) => {
                tracing::debug!("Failed to read error body: {}", e);
                error_detail(status, reason.as_deref(), &[])
            }
        };
        Err(ChatError::RequestFailed { status, message })
    }

    /// Probe the backend.
    pub async fn health(&self) -> ChatResult<HealthStatus> {
        let url = self.config.endpoint("/health");
        let response = self.http.get(&url, &Headers::new()).await?;
        if !response.is_success() {
            return Err(ChatError::RequestFailed {
                status: response.status,
                message: error_detail(response.status, None, &response.body),
            });
        }
        response.json().map_err(|e| ChatError::RequestFailed {
            status: response.status,
            message: format!("invalid health response: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::HttpError;
    use bytes::Bytes;
    use futures::StreamExt;
    use serde_json::json;

    const BASE: &str = "http://chat.test";

    fn api(mock: &Arc<MockHttpClient>) -> ChatApi<MockHttpClient> {
        ChatApi::new(Arc::clone(mock), ClientConfig::new().with_base_url(BASE))
    }

    #[test]
    fn test_error_detail_prefers_detail_field() {
        let body = br#"{"detail":"overloaded"}"#;
        assert_eq!(error_detail(500, Some("Internal Server Error"), body), "overloaded");
    }

    #[test]
    fn test_error_detail_falls_back_to_reason_then_status() {
        assert_eq!(
            error_detail(502, Some("Bad Gateway"), b"<html>oops</html>"),
            "Bad Gateway"
        );
        assert_eq!(error_detail(502, Some("Bad Gateway"), br#"{"detail":""}"#), "Bad Gateway");
        assert_eq!(error_detail(502, Some("Bad Gateway"), br#"{"detail":null}"#), "Bad Gateway");
        assert_eq!(error_detail(599, None, b""), "HTTP 599");
    }

    #[test]
    fn test_error_detail_renders_structured_detail() {
        let body = br#"{"detail":[{"loc":["body","message"],"msg":"field required"}]}"#;
        let message = error_detail(422, Some("Unprocessable Entity"), body);
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest::new(SessionId::new("s-1"), "hello");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"session_id": "s-1", "message": "hello"})
        );
    }

    #[tokio::test]
    async fn test_create_session() {
        let mock = Arc::new(MockHttpClient::new());
        mock.set_response(
            "http://chat.test/session",
            MockResponse::json(200, json!({"session_id": "abc-123"})),
        );

        let id = api(&mock).create_session().await.unwrap();
        assert_eq!(id.as_str(), "abc-123");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
    }

    #[tokio::test]
    async fn test_create_session_failures() {
        let mock = Arc::new(MockHttpClient::new());
        let url = "http://chat.test/session";

        mock.set_response(url, MockResponse::json(503, json!({"detail": "starting up"})));
        match api(&mock).create_session().await {
            Err(ChatError::SessionUnavailable { message }) => assert_eq!(message, "starting up"),
            other => panic!("Expected SessionUnavailable, got {:?}", other),
        }

        mock.set_response(url, MockResponse::json(200, json!({"id": "wrong-field"})));
        assert!(matches!(
            api(&mock).create_session().await,
            Err(ChatError::SessionUnavailable { .. })
        ));

        mock.set_response(url, MockResponse::json(200, json!({"session_id": ""})));
        assert!(matches!(
            api(&mock).create_session().await,
            Err(ChatError::SessionUnavailable { .. })
        ));

        mock.set_response(
            url,
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );
        assert!(matches!(
            api(&mock).create_session().await,
            Err(ChatError::Transport(HttpError::ConnectionFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_open_chat_sends_json_and_streams_body() {
        let mock = Arc::new(MockHttpClient::new());
        mock.set_response(
            "http://chat.test/chat",
            MockResponse::sse(["data: {\"type\":\"done\"}\n\n"]),
        );

        let request = ChatRequest::new(SessionId::new("s-1"), "hi");
        let mut body = api(&mock).open_chat(&request).await.unwrap();
        let chunk = body.next().await.unwrap().unwrap();
        assert_eq!(chunk, Bytes::from("data: {\"type\":\"done\"}\n\n"));

        let sent = &mock.requests()[0];
        assert_eq!(sent.url, "http://chat.test/chat");
        assert_eq!(
            sent.headers.get("Accept").map(String::as_str),
            Some("text/event-stream")
        );
        let json: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(json, json!({"session_id": "s-1", "message": "hi"}));
    }

    #[tokio::test]
    async fn test_open_chat_non_success_status() {
        let mock = Arc::new(MockHttpClient::new());
        mock.set_response(
            "http://chat.test/chat",
            MockResponse::json(404, json!({"detail": "Session not found"})),
        );

        let request = ChatRequest::new(SessionId::new("gone"), "hi");
        match api(&mock).open_chat(&request).await {
            Err(ChatError::RequestFailed { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Session not found");
            }
            other => panic!("Expected RequestFailed, got {:?}", other.map(|_| ())),
        }
        assert_eq!(mock.open_bodies(), 0);
    }

    #[tokio::test]
    async fn test_open_chat_transport_failure() {
        let mock = Arc::new(MockHttpClient::new());
        mock.set_response(
            "http://chat.test/chat",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let request = ChatRequest::new(SessionId::new("s"), "hi");
        assert!(matches!(
            api(&mock).open_chat(&request).await,
            Err(ChatError::StreamTerminatedAbnormally { .. })
        ));
    }

    #[tokio::test]
    async fn test_health() {
        let mock = Arc::new(MockHttpClient::new());
        mock.set_response(
            "http://chat.test/health",
            MockResponse::json(200, json!({"status": "ok", "sessions": 3})),
        );

        let health = api(&mock).health().await.unwrap();
        assert!(health.is_ok());
        assert_eq!(health.sessions, 3);
    }
}
