//! Error handling for streamchat.
//!
//! | Error | Raised when | Turn state |
//! |-------|-------------|------------|
//! | `EmptyMessage`, `SessionMissing`, `TurnInProgress` | turn refused before sending | never started |
//! | `RequestFailed` | `/chat` answered non-2xx | Failed |
//! | `StreamError` | backend sent an `error` event | Failed |
//! | `StreamTerminatedAbnormally` | read failure or no `done`/`error` | Failed |
//! | `SessionUnavailable`, `Transport` | session creation or health check | n/a |
//!
//! Malformed or unrecognised frames are not errors; the parser skips them.

mod chat;

pub use chat::ChatError;

/// Result type alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
