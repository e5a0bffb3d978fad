//! One chat turn, from request to terminal state.

use futures::StreamExt;

use crate::api::{ChatApi, ChatRequest};
use crate::error::{ChatError, ChatResult};
use crate::session::output::TurnOutput;
use crate::sse::{SsePipeline, StreamEvent};
use crate::traits::{ByteStream, ChatEvents, HttpClient};

/// Lifecycle of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Opening,
    Streaming,
    Completed,
    Failed,
}

/// Drives one turn through `Idle -> Opening -> Streaming -> Completed | Failed`.
///
/// Owns the decoding pipeline and the reply accumulator of its turn. Both
/// `run` and `consume` take the session by value, so a finished session can
/// not be started again; every turn gets a fresh one.
///
/// On failure the session reports the notice through `on_error`. When the
/// failure happens after streaming began, `on_assistant_message_withdrawn`
/// comes first so the partial reply can be taken down.
#[derive(Debug)]
pub struct StreamSession {
    state: StreamState,
    pipeline: SsePipeline,
    output: TurnOutput,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSession {
    pub fn new() -> Self {
        Self {
            state: StreamState::Idle,
            pipeline: SsePipeline::new(),
            output: TurnOutput::new(),
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Send `request` and stream the reply.
    ///
    /// Returns the complete reply on `Completed`.
    pub async fn run<C>(
        mut self,
        api: &ChatApi<C>,
        request: &ChatRequest,
        events: &dyn ChatEvents,
    ) -> ChatResult<String>
    where
        C: HttpClient + ?Sized,
    {
        self.drive(api, request, events).await
    }

    /// Stream a body whose response status was already accepted.
    pub async fn consume(mut self, body: ByteStream, events: &dyn ChatEvents) -> ChatResult<String> {
        let result = self.stream(body, events).await;
        self.settle(result, events)
    }

    async fn drive<C>(
        &mut self,
        api: &ChatApi<C>,
        request: &ChatRequest,
        events: &dyn ChatEvents,
    ) -> ChatResult<String>
    where
        C: HttpClient + ?Sized,
    {
        self.transition(StreamState::Opening);
        let result = match api.open_chat(request).await {
            Ok(body) => self.stream(body, events).await,
            Err(e) => Err(e),
        };
        self.settle(result, events)
    }

    /// The read loop. Returns as soon as a terminal event is seen; the body
    /// is dropped on every return path.
    async fn stream(&mut self, mut body: ByteStream, events: &dyn ChatEvents) -> ChatResult<String> {
        self.transition(StreamState::Streaming);

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ChatError::StreamTerminatedAbnormally {
                reason: e.to_string(),
            })?;

            for event in self.pipeline.feed(&chunk) {
                match event {
                    StreamEvent::Token { content } => {
                        let partial = self.output.append(&content);
                        events.on_assistant_token_appended(partial);
                    }
                    StreamEvent::Done => {
                        let dropped = self.pipeline.discard();
                        if dropped > 0 {
                            tracing::trace!(dropped, "Discarding input after done");
                        }
                        return Ok(std::mem::take(&mut self.output).finalize());
                    }
                    StreamEvent::Error { content } => {
                        return Err(ChatError::StreamError { message: content });
                    }
                }
            }
        }

        Err(ChatError::StreamTerminatedAbnormally {
            reason: "stream ended without a done event".to_string(),
        })
    }

    fn settle(&mut self, result: ChatResult<String>, events: &dyn ChatEvents) -> ChatResult<String> {
        match result {
            Ok(text) => {
                self.transition(StreamState::Completed);
                events.on_assistant_message_finalized(&text);
                Ok(text)
            }
            Err(err) => {
                let streamed = self.state == StreamState::Streaming;
                self.transition(StreamState::Failed);
                let withdrawn = self.output.withdraw();
                tracing::warn!(
                    code = err.error_code(),
                    withdrawn,
                    "Turn failed: {}",
                    err
                );
                if streamed {
                    events.on_assistant_message_withdrawn();
                }
                events.on_error(&err.user_message());
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: StreamState) {
        tracing::debug!(from = ?self.state, to = ?next, "Stream state");
        self.state = next;
    }
}
