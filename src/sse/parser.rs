//! SSE frame parsing
//!
//! Turns one blank-line-delimited frame into a typed StreamEvent. Frames
//! that are not `data:` frames, carry malformed JSON, or name an event type
//! we do not know are skipped rather than treated as stream failures.

use crate::sse::events::{StreamEvent, SseParseError};
use crate::sse::payloads::EventPayload;

/// Field prefix carrying the JSON payload
const DATA_PREFIX: &str = "data:";

/// Parse a frame, dropping it silently if it yields no event.
///
/// Skipped frames are traced so they can be inspected with
/// `RUST_LOG=streamchat=trace`, but never reach the caller.
pub fn parse_frame(frame: &str) -> Option<StreamEvent> {
    match decode_frame(frame) {
        Ok(event) => Some(event),
        Err(reason) => {
            tracing::trace!(%reason, frame_len = frame.len(), "Skipping SSE frame");
            None
        }
    }
}

/// Parse a frame, reporting why it was skipped.
pub fn decode_frame(frame: &str) -> Result<StreamEvent, SseParseError> {
    let data = extract_data(frame).ok_or(SseParseError::NotData)?;

    let payload: EventPayload =
        serde_json::from_str(&data).map_err(|e| SseParseError::InvalidJson {
            source: e.to_string(),
        })?;

    match payload.kind.as_str() {
        "token" => Ok(StreamEvent::Token {
            content: payload.content.unwrap_or_default(),
        }),
        "done" => Ok(StreamEvent::Done),
        "error" => Ok(StreamEvent::Error {
            content: payload.content.unwrap_or_default(),
        }),
        other => Err(SseParseError::UnknownEventType(other.to_string())),
    }
}

/// Pull the data payload out of a frame.
///
/// The trimmed frame must open with `data:`. When later lines repeat the
/// field, the values are joined with `\n` and any other line is ignored;
/// otherwise everything after the prefix is the payload.
fn extract_data(frame: &str) -> Option<String> {
    let frame = frame.trim();
    let rest = frame.strip_prefix(DATA_PREFIX)?;

    let mut lines = rest.lines();
    let first = lines.next().unwrap_or_default();
    let continued: Vec<&str> = lines
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(str::trim)
        .collect();

    if continued.is_empty() {
        return Some(rest.trim().to_string());
    }

    let mut data = first.trim().to_string();
    for part in continued {
        data.push('\n');
        data.push_str(part);
    }
    Some(data)
}
