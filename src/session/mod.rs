//! Chat session and turn lifecycle.
//!
//! - [`StreamSession`] drives a single turn over one response body.
//! - [`ConversationState`] holds the session id and the transcript.
//! - [`ChatClient`] ties both together and enforces one turn at a time.

pub mod client;
pub mod output;
pub mod state;
pub mod stream;

pub use client::ChatClient;
pub use output::TurnOutput;
pub use state::{ConversationState, Role, TranscriptEntry};
pub use stream::{StreamSession, StreamState};
