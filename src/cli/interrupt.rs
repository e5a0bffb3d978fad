//! Ctrl-C handling for the interactive loop.
//!
//! Once the process listens for Ctrl-C the default terminate action is gone
//! for good, so every wait in the loop has to race the signal itself.

use std::future::Future;

/// Run `work` unless `interrupt` resolves first.
///
/// Returns `None` when interrupted; `work` is dropped at that point, which
/// abandons whatever it was doing. The interrupt wins when both are ready.
pub async fn until_interrupted<F, I>(work: F, interrupt: I) -> Option<F::Output>
where
    F: Future,
    I: Future,
{
    tokio::select! {
        biased;
        _ = interrupt => None,
        output = work => Some(output),
    }
}

/// [`until_interrupted`] with Ctrl-C as the interrupt.
pub async fn until_ctrl_c<F: Future>(work: F) -> Option<F::Output> {
    until_interrupted(work, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C listener failed: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse, RecordingEvents};
    use crate::config::ClientConfig;
    use crate::session::ChatClient;
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_work_finishes_without_interrupt() {
        let output = until_interrupted(async { 7 }, std::future::pending::<()>()).await;
        assert_eq!(output, Some(7));
    }

    #[tokio::test]
    async fn test_interrupt_ends_blocked_wait() {
        let output = until_interrupted(std::future::pending::<u8>(), async {}).await;
        assert_eq!(output, None);
    }

    #[tokio::test]
    async fn test_interrupt_abandons_streaming_turn() {
        let mock = Arc::new(MockHttpClient::new());
        mock.set_response(
            "http://chat.test/session",
            MockResponse::json(200, json!({"session_id": "s-1"})),
        );
        mock.set_response(
            "http://chat.test/chat",
            MockResponse::Stalled {
                status: 200,
                chunks: vec![Bytes::from("data: {\"type\":\"token\",\"content\":\"A\"}\n\n")],
            },
        );
        let events = Arc::new(RecordingEvents::new());
        let client = ChatClient::new(
            Arc::clone(&mock),
            ClientConfig::new().with_base_url("http://chat.test"),
            events.clone(),
        );
        client.reset().await.unwrap();

        let interrupt = tokio::time::sleep(std::time::Duration::from_millis(50));
        let output = until_interrupted(client.submit("hello"), interrupt).await;

        assert!(output.is_none());
        assert!(!client.is_turn_active());
        assert_eq!(mock.open_bodies(), 0);
        assert!(events.errors().is_empty());
    }
}
