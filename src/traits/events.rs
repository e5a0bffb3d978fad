//! Chat event sink trait abstraction.
//!
//! The boundary between the streaming core and whatever renders the
//! conversation. The core only calls these hooks; it never draws anything.

use std::sync::Arc;

/// Observer for everything a renderer needs to show one conversation.
///
/// Calls arrive in order on the task driving the turn. Implementations
/// should return quickly: the next chunk is not read until a hook returns.
///
/// # Example
///
/// ```ignore
/// use streamchat::traits::ChatEvents;
///
/// struct Printer;
///
/// impl ChatEvents for Printer {
///     fn on_user_message(&self, text: &str) { println!("You: {}", text); }
///     fn on_assistant_token_appended(&self, partial: &str) { println!("{}", partial); }
///     fn on_assistant_message_finalized(&self, full: &str) { println!("Assistant: {}", full); }
///     fn on_error(&self, message: &str) { eprintln!("Error: {}", message); }
/// }
/// ```
pub trait ChatEvents: Send + Sync {
    /// A turn was accepted and its message is about to be sent.
    fn on_user_message(&self, text: &str);

    /// A token arrived; `partial_text` is the whole reply so far.
    fn on_assistant_token_appended(&self, partial_text: &str);

    /// The reply completed; `full_text` is final.
    fn on_assistant_message_finalized(&self, full_text: &str);

    /// The turn failed; `message` is the notice to show the user.
    fn on_error(&self, message: &str);

    /// The in-progress reply of a failed turn must be taken down.
    ///
    /// Always followed by `on_error`.
    fn on_assistant_message_withdrawn(&self) {}

    /// A new conversation started and prior history should be cleared.
    fn on_conversation_reset(&self) {}
}

impl<T: ChatEvents + ?Sized> ChatEvents for Arc<T> {
    fn on_user_message(&self, text: &str) {
        (**self).on_user_message(text)
    }

    fn on_assistant_token_appended(&self, partial_text: &str) {
        (**self).on_assistant_token_appended(partial_text)
    }

    fn on_assistant_message_finalized(&self, full_text: &str) {
        (**self).on_assistant_message_finalized(full_text)
    }

    fn on_error(&self, message: &str) {
        (**self).on_error(message)
    }

    fn on_assistant_message_withdrawn(&self) {
        (**self).on_assistant_message_withdrawn()
    }

    fn on_conversation_reset(&self) {
        (**self).on_conversation_reset()
    }
}
