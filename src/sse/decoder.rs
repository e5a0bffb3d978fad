//! Incremental UTF-8 decoding of response body chunks.
//!
//! Network reads do not respect character boundaries, so a multi-byte
//! character can arrive split across two chunks. `ByteDecoder` holds the
//! incomplete tail back and prefixes it to the next chunk instead of
//! emitting replacement characters for it.

/// Longest possible incomplete UTF-8 sequence carried between chunks.
const MAX_PENDING: usize = 3;

/// Stateful byte-to-text decoder for a single response body.
#[derive(Debug, Default)]
pub struct ByteDecoder {
    /// Bytes of a character that has not been completed yet
    pending: Vec<u8>,
}

impl ByteDecoder {
    /// Create a new decoder with no buffered bytes
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all text that is complete so far.
    ///
    /// Invalid byte sequences are replaced with U+FFFD where they are found.
    /// An incomplete sequence at the end of `chunk` is buffered and never
    /// shows up in the output until the bytes completing it arrive.
    pub fn feed(&mut self, chunk: &[u8]) -> String {
        let joined;
        let mut input: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            joined = std::mem::take(&mut self.pending);
            &joined
        };

        let mut out = String::with_capacity(input.len());
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    // `valid_up_to` marks a prefix that is always valid UTF-8
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[bad..];
                        }
                        None => {
                            // Truncated sequence at the end of the input
                            debug_assert!(rest.len() <= MAX_PENDING);
                            self.pending.extend_from_slice(rest);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Number of bytes waiting for the rest of their character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Flush the decoder at end of stream.
    ///
    /// Any incomplete sequence left over can never be completed and is
    /// returned as a single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}
