//! SSE payload deserialization structs
//!
//! Contains the internal struct used to deserialize the JSON object carried
//! by a `data:` field before it is mapped onto a StreamEvent.

use serde::Deserialize;

/// Raw JSON object from a data field.
///
/// Every event kind shares this shape; `content` is absent on `done` and
/// may be null. Unrecognised extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventPayload {
    /// Discriminator: "token", "done" or "error"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
}
