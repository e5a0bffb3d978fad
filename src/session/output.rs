//! In-progress assistant reply for one turn.

/// Accumulator for the assistant's reply.
///
/// Appended to as tokens arrive, then either finalized into the answer or
/// withdrawn when the turn fails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    text: String,
}

impl TurnOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token and return the reply so far.
    pub fn append(&mut self, token: &str) -> &str {
        self.text.push_str(token);
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the accumulator, yielding the final reply.
    pub fn finalize(self) -> String {
        self.text
    }

    /// Throw away the partial reply, returning how many bytes were dropped.
    pub fn withdraw(&mut self) -> usize {
        let dropped = self.text.len();
        self.text.clear();
        dropped
    }
}
