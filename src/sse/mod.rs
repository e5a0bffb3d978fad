//! SSE (Server-Sent Events) stream decoding
//!
//! Turns the raw body of a chat response into typed events. The stream
//! format is a sequence of frames separated by a blank line, each carrying
//! a JSON object in a `data:` field:
//! - `{"type": "token", "content": "..."}` - next piece of the reply
//! - `{"type": "done"}` - reply complete
//! - `{"type": "error", "content": "..."}` - backend failure
//!
//! # Module structure
//! - `decoder` - UTF-8 decoding that survives characters split across reads
//! - `splitter` - Frame splitting with carry-over between reads
//! - `events` - Event type definitions (StreamEvent, SseParseError)
//! - `payloads` - Internal payload deserialization struct
//! - `parser` - Frame parsing (parse_frame, decode_frame)
//! - `pipeline` - All of the above chained for one response body

mod decoder;
mod events;
mod parser;
mod payloads;
mod pipeline;
mod splitter;

// Re-export public types
pub use decoder::ByteDecoder;
pub use events::{SseParseError, StreamEvent};
pub use parser::{decode_frame, parse_frame};
pub use pipeline::SsePipeline;
pub use splitter::SseFrameSplitter;
