//! Frame splitting on the SSE blank-line delimiter.
//!
//! Decoded text is appended to a carry-over buffer which is then cut on
//! `"\n\n"`. Every piece but the last is a complete frame. The last piece is
//! kept for the next read, because the frame it starts may still be arriving.

/// Blank line separating two frames
const FRAME_DELIMITER: &str = "\n\n";

/// Stateful splitter turning decoded text into complete SSE frames.
#[derive(Debug, Default)]
pub struct SseFrameSplitter {
    /// Unconsumed tail of the decoded text
    buffer: String,
}

impl SseFrameSplitter {
    /// Create a splitter with an empty carry-over buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return every frame it completes, in arrival order.
    ///
    /// CRLF line endings are folded to LF first, so `"\r\n\r\n"` delimits
    /// frames as well. A lone `\r` at the very end of the buffer is left
    /// alone until the next push shows whether a `\n` follows it.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.buffer.push_str(text);
        if self.buffer.contains("\r\n") {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].find(FRAME_DELIMITER) {
            frames.push(self.buffer[consumed..consumed + pos].to_string());
            consumed += pos + FRAME_DELIMITER.len();
        }
        self.buffer.drain(..consumed);
        frames
    }

    /// The carry-over that does not form a complete frame yet
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Drop the carry-over
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
