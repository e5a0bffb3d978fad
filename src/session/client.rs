//! Conversation driver: session lifecycle plus one turn at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ChatApi, ChatRequest, SessionId};
use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::session::state::{ConversationState, Role, TranscriptEntry};
use crate::session::stream::StreamSession;
use crate::traits::{ChatEvents, HttpClient};

/// Marks a turn as in flight for as long as it lives.
struct TurnGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> TurnGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Chat client for one conversation.
///
/// Holds the current session id and transcript and allows a single turn in
/// flight. Dropping the future returned by [`ChatClient::submit`] abandons
/// the turn: the response body is released and a new turn may start.
///
/// # Example
///
/// ```ignore
/// let client = ChatClient::new(http, ClientConfig::from_env(), events);
/// client.reset().await?;
/// let reply = client.submit("Hello").await?;
/// ```
pub struct ChatClient<C: ?Sized> {
    api: ChatApi<C>,
    state: Mutex<ConversationState>,
    turn_active: AtomicBool,
    events: Arc<dyn ChatEvents>,
}

impl<C: HttpClient + ?Sized> ChatClient<C> {
    pub fn new(http: Arc<C>, config: ClientConfig, events: Arc<dyn ChatEvents>) -> Self {
        Self::with_api(ChatApi::new(http, config), events)
    }

    pub fn with_api(api: ChatApi<C>, events: Arc<dyn ChatEvents>) -> Self {
        Self {
            api,
            state: Mutex::new(ConversationState::new()),
            turn_active: AtomicBool::new(false),
            events,
        }
    }

    pub fn api(&self) -> &ChatApi<C> {
        &self.api
    }

    /// Start a new conversation.
    ///
    /// Turns submitted while this runs wait for it to finish. On failure the
    /// previous session id and transcript are kept.
    pub async fn reset(&self) -> ChatResult<SessionId> {
        let mut state = self.state.lock().await;
        if self.is_turn_active() {
            return Err(ChatError::TurnInProgress);
        }

        match self.api.create_session().await {
            Ok(id) => {
                tracing::info!(session_id = %id, "Started new session");
                state.start_session(id.clone());
                self.events.on_conversation_reset();
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), "Session reset failed: {}", err);
                self.events.on_error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Run one turn and return the assistant's reply.
    ///
    /// Empty messages, a missing session and a turn already in flight are
    /// refused before anything is sent and produce no events.
    pub async fn submit(&self, message: &str) -> ChatResult<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (_guard, session_id) = {
            let mut state = self.state.lock().await;
            let session_id = state.current_id().cloned().ok_or(ChatError::SessionMissing)?;
            let guard = TurnGuard::acquire(&self.turn_active).ok_or(ChatError::TurnInProgress)?;
            state.record(Role::User, message);
            (guard, session_id)
        };

        tracing::debug!(session_id = %session_id, "Submitting turn");
        self.events.on_user_message(message);

        let request = ChatRequest::new(session_id, message);
        let reply = StreamSession::new()
            .run(&self.api, &request, self.events.as_ref())
            .await?;

        self.state.lock().await.record(Role::Assistant, reply.as_str());
        Ok(reply)
    }

    pub async fn current_id(&self) -> Option<SessionId> {
        self.state.lock().await.current_id().cloned()
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.state.lock().await.transcript().to_vec()
    }

    pub fn is_turn_active(&self) -> bool {
        self.turn_active.load(Ordering::Acquire)
    }
}
