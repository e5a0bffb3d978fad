//! Chat turn error types.
//!
//! Every failure a turn or a session reset can run into. Rejections happen
//! before any request is sent; the remaining variants end a turn in the
//! failed state. None of them touch the current session id.

use thiserror::Error;

use crate::traits::HttpError;

/// Fallback notice when the backend reports an error without a message.
const UNSPECIFIED_STREAM_ERROR: &str = "The server reported an error.";

/// Error type for chat operations.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Submitted text was empty after trimming
    #[error("Message is empty")]
    EmptyMessage,

    /// Turn attempted before a session id was obtained
    #[error("No active session")]
    SessionMissing,

    /// Another turn is still streaming
    #[error("A turn is already in progress")]
    TurnInProgress,

    /// The session endpoint did not hand out an id
    #[error("Session creation failed: {message}")]
    SessionUnavailable { message: String },

    /// Chat endpoint answered with a non-2xx status
    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// Backend sent an `error` event mid-stream
    #[error("Stream error: {message}")]
    StreamError { message: String },

    /// Connection or read failure, or the body ended without `done`/`error`
    #[error("Stream terminated abnormally: {reason}")]
    StreamTerminatedAbnormally { reason: String },

    /// Transport failure outside of a turn
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),
}

impl ChatError {
    /// Whether the turn was refused before anything was sent.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ChatError::EmptyMessage | ChatError::SessionMissing | ChatError::TurnInProgress
        )
    }

    /// Get the notice shown to the user.
    ///
    /// Errors carrying a server-provided message surface that message as is.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::EmptyMessage => "Type a message before sending.".to_string(),
            ChatError::SessionMissing => {
                "No active session. Start a new chat and try again.".to_string()
            }
            ChatError::TurnInProgress => {
                "Please wait for the current response to complete before sending another message."
                    .to_string()
            }
            ChatError::SessionUnavailable { message } => {
                format!("Could not start a new chat: {}", message)
            }
            ChatError::RequestFailed { message, .. } => message.clone(),
            ChatError::StreamError { message } if message.is_empty() => {
                UNSPECIFIED_STREAM_ERROR.to_string()
            }
            ChatError::StreamError { message } => message.clone(),
            ChatError::StreamTerminatedAbnormally { reason } => {
                format!("The response ended before it was complete ({}).", reason)
            }
            ChatError::Transport(err) => format!("Unable to reach the chat server: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::EmptyMessage => "E_CHAT_EMPTY",
            ChatError::SessionMissing => "E_CHAT_NO_SESSION",
            ChatError::TurnInProgress => "E_CHAT_BUSY",
            ChatError::SessionUnavailable { .. } => "E_CHAT_SESSION",
            ChatError::RequestFailed { .. } => "E_CHAT_REQUEST",
            ChatError::StreamError { .. } => "E_CHAT_STREAM",
            ChatError::StreamTerminatedAbnormally { .. } => "E_CHAT_ABNORMAL",
            ChatError::Transport(_) => "E_CHAT_TRANSPORT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_not_turn_failures() {
        for err in [
            ChatError::EmptyMessage,
            ChatError::SessionMissing,
            ChatError::TurnInProgress,
        ] {
            assert!(err.is_rejection(), "{:?}", err);
        }
    }

    #[test]
    fn test_turn_failures() {
        let errors = vec![
            ChatError::RequestFailed {
                status: 500,
                message: "overloaded".to_string(),
            },
            ChatError::StreamError {
                message: "model crashed".to_string(),
            },
            ChatError::StreamTerminatedAbnormally {
                reason: "stream ended without done".to_string(),
            },
        ];
        for err in errors {
            assert!(!err.is_rejection(), "{:?}", err);
        }
    }

    #[test]
    fn test_server_messages_surface_verbatim() {
        let err = ChatError::RequestFailed {
            status: 500,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.user_message(), "overloaded");
        assert_eq!(err.to_string(), "Request failed (500): overloaded");

        let err = ChatError::StreamError {
            message: "model crashed".to_string(),
        };
        assert_eq!(err.user_message(), "model crashed");
    }

    #[test]
    fn test_empty_stream_error_gets_fallback_notice() {
        let err = ChatError::StreamError {
            message: String::new(),
        };
        assert_eq!(err.user_message(), UNSPECIFIED_STREAM_ERROR);
    }

    #[test]
    fn test_transport_from_http_error() {
        let err: ChatError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert!(matches!(err, ChatError::Transport(_)));
        assert_eq!(err.error_code(), "E_CHAT_TRANSPORT");
        assert!(err.user_message().contains("refused"));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            ChatError::EmptyMessage.error_code(),
            ChatError::SessionMissing.error_code(),
            ChatError::TurnInProgress.error_code(),
            ChatError::SessionUnavailable {
                message: String::new(),
            }
            .error_code(),
            ChatError::RequestFailed {
                status: 0,
                message: String::new(),
            }
            .error_code(),
            ChatError::StreamError {
                message: String::new(),
            }
            .error_code(),
            ChatError::StreamTerminatedAbnormally {
                reason: String::new(),
            }
            .error_code(),
            ChatError::Transport(HttpError::Timeout(String::new())).error_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
