//! SSE event types and definitions
//!
//! Contains the StreamEvent enum produced by the frame parser and the
//! reasons a frame can be skipped.

use serde::Serialize;

/// Typed event decoded from one `data:` frame of the chat stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Next piece of the assistant reply
    Token { content: String },
    /// Reply finished cleanly
    Done,
    /// Backend failed mid-stream
    Error { content: String },
}

/// Why a frame produced no event.
///
/// None of these abort the stream; the frame is dropped and reading
/// continues with the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// Frame does not start with a `data:` field (comment, id, keepalive)
    NotData,
    /// Payload after `data:` is not the expected JSON object
    InvalidJson { source: String },
    /// Payload decoded but its `type` is not one we handle
    UnknownEventType(String),
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::NotData => write!(f, "Frame has no data field"),
            SseParseError::InvalidJson { source } => {
                write!(f, "Invalid JSON in data field: {}", source)
            }
            SseParseError::UnknownEventType(t) => write!(f, "Unknown SSE event type: {}", t),
        }
    }
}

impl std::error::Error for SseParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_wire_shape() {
        let json = serde_json::to_value(StreamEvent::Token {
            content: "Hi".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "token", "content": "Hi"}));
        let json = serde_json::to_value(StreamEvent::Done).unwrap();
        assert_eq!(json, serde_json::json!({"type": "done"}));
    }

    #[test]
    fn test_sse_parse_error_display() {
        let err = SseParseError::UnknownEventType("ping".to_string());
        assert_eq!(format!("{}", err), "Unknown SSE event type: ping");

        let err = SseParseError::InvalidJson {
            source: "expected value".to_string(),
        };
        assert!(format!("{}", err).contains("Invalid JSON"));
        assert_eq!(SseParseError::NotData.to_string(), "Frame has no data field");
    }
}
