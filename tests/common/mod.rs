//! Common test utilities for integration tests.
//!
//! Builds a [`ChatClient`] on the real reqwest adapter, pointed at a
//! wiremock server, with a recording event sink.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use streamchat::adapters::mock::RecordingEvents;
use streamchat::adapters::ReqwestHttpClient;
use streamchat::config::ClientConfig;
use streamchat::session::ChatClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client plus the sink it reports to.
pub struct TestChat {
    pub client: ChatClient<ReqwestHttpClient>,
    pub events: Arc<RecordingEvents>,
}

pub fn test_chat(server: &MockServer) -> TestChat {
    let events = Arc::new(RecordingEvents::new());
    let config = ClientConfig::new().with_base_url(server.uri());
    let client = ChatClient::new(Arc::new(ReqwestHttpClient::new()), config, events.clone());
    TestChat { client, events }
}

/// Fresh random session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One SSE frame carrying a token.
pub fn token_frame(content: &str) -> String {
    format!("data: {}\n\n", json!({"type": "token", "content": content}))
}

/// The frame the backend sends when a reply is complete.
pub fn done_frame() -> String {
    "data: {\"type\":\"done\",\"content\":\"\"}\n\n".to_string()
}

pub fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

/// Serve `POST /session` with the given id.
pub async fn mount_session(server: &MockServer, session_id: &str) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session_id": session_id })))
        .mount(server)
        .await;
}
