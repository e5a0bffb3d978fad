//! Byte-to-event pipeline for a single response body.

use crate::sse::decoder::ByteDecoder;
use crate::sse::events::StreamEvent;
use crate::sse::parser::parse_frame;
use crate::sse::splitter::SseFrameSplitter;

/// Decoder, splitter and parser chained together.
///
/// One pipeline belongs to one turn. Nothing in it is shared, so a fresh
/// instance is built for every stream instead of resetting an old one.
#[derive(Debug, Default)]
pub struct SsePipeline {
    decoder: ByteDecoder,
    splitter: SseFrameSplitter,
}

impl SsePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a raw chunk through the pipeline.
    ///
    /// Returns the events of every frame this chunk completed, in arrival
    /// order. Frames that yield no event are dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let text = self.decoder.feed(chunk);
        self.splitter
            .push(&text)
            .iter()
            .filter_map(|frame| parse_frame(frame))
            .collect()
    }

    /// Bytes and text still buffered, waiting for more input
    pub fn buffered_len(&self) -> usize {
        self.decoder.pending_len() + self.splitter.pending().len()
    }

    /// Discard everything still buffered.
    ///
    /// Returns how many bytes of undecoded input and unterminated frame text
    /// were thrown away.
    pub fn discard(&mut self) -> usize {
        let dropped = self.buffered_len();
        self.decoder.finish();
        self.splitter.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = concat!(
        "data: {\"type\":\"token\",\"content\":\"Grüße \"}\n\n",
        ": keepalive\n\n",
        "data: {\"type\":\"token\",\"content\":\"🦀\"}\n\n",
        "data: {broken\n\n",
        "data: {\"type\":\"usage\",\"content\":\"12\"}\n\n",
        "data: {\"type\":\"done\",\"content\":\"\"}\n\n",
    );

    fn baseline() -> Vec<StreamEvent> {
        SsePipeline::new().feed(STREAM.as_bytes())
    }

    fn feed_split(chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut pipeline = SsePipeline::new();
        chunks.iter().flat_map(|c| pipeline.feed(c)).collect()
    }

    #[test]
    fn test_baseline_events() {
        assert_eq!(
            baseline(),
            vec![
                StreamEvent::Token {
                    content: "Grüße ".to_string()
                },
                StreamEvent::Token {
                    content: "🦀".to_string()
                },
                StreamEvent::Done,
            ]
        );
    }

    #[test]
    fn test_every_two_way_split_matches_baseline() {
        let bytes = STREAM.as_bytes();
        let expected = baseline();
        for at in 0..=bytes.len() {
            let (a, b) = bytes.split_at(at);
            assert_eq!(feed_split(&[a, b]), expected, "split at byte {}", at);
        }
    }

    #[test]
    fn test_byte_at_a_time_matches_baseline() {
        let chunks: Vec<&[u8]> = STREAM.as_bytes().chunks(1).collect();
        assert_eq!(feed_split(&chunks), baseline());
    }

    #[test]
    fn test_three_way_splits_match_baseline() {
        let bytes = STREAM.as_bytes();
        let expected = baseline();
        for i in (0..bytes.len()).step_by(7) {
            for j in (i..=bytes.len()).step_by(5) {
                let chunks = [&bytes[..i], &bytes[i..j], &bytes[j..]];
                assert_eq!(feed_split(&chunks), expected, "splits at {} and {}", i, j);
            }
        }
    }

    #[test]
    fn test_split_token_scenario() {
        let events = feed_split(&[
            b"data: {\"typ",
            b"e\":\"token\",\"content\":\"Hi\"}\n\n",
        ]);
        assert_eq!(
            events,
            vec![StreamEvent::Token {
                content: "Hi".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_chunks_add_nothing() {
        let mut pipeline = SsePipeline::new();
        assert_eq!(pipeline.feed(STREAM.as_bytes()).len(), 3);
        assert!(pipeline.feed(b"").is_empty());
        assert!(pipeline.feed(b"").is_empty());
    }

    #[test]
    fn test_discard_reports_buffered_bytes() {
        let mut pipeline = SsePipeline::new();
        pipeline.feed(b"data: {\"type\"");
        pipeline.feed(&[0xC3]);
        assert_eq!(pipeline.buffered_len(), 14);
        assert_eq!(pipeline.discard(), 14);
        assert_eq!(pipeline.buffered_len(), 0);
    }
}
