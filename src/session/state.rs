//! Conversation-wide state shared by consecutive turns.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::SessionId;

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message as displayed in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Current session id plus the history shown for it.
///
/// Turns are refused while `session_id` is `None`. A failed turn leaves the
/// id untouched so the next turn can reuse it.
#[derive(Debug, Default, Clone)]
pub struct ConversationState {
    session_id: Option<SessionId>,
    transcript: Vec<TranscriptEntry>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Switch to a new session, clearing the history of the old one.
    pub fn start_session(&mut self, id: SessionId) {
        self.session_id = Some(id);
        self.transcript.clear();
    }

    pub fn record(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry::new(role, content));
    }
}
