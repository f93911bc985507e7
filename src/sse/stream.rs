//! Byte-level decoding pipeline for one response body.

use super::decoder::Utf8ChunkDecoder;
use super::events::{BlockOutcome, RawBlock};
use super::parser::parse_block;
use super::splitter::{FrameSplitter, Framing};

/// Bytes in, parsed outcomes out.
///
/// Chains the UTF-8 decoder, the frame splitter and the block parser. Blocks
/// that yield nothing ([`BlockOutcome::Skip`]) are filtered out, so callers
/// see only events and the end-of-stream sentinel, in wire order.
///
/// # Example
///
/// ```ignore
/// use docchat::sse::{BlockOutcome, Framing, StreamDecoder};
///
/// let mut decoder = StreamDecoder::new(Framing::Auto);
/// let mut outcomes = decoder.push_bytes(b"event: stream\ndata: {\"answer\":\"Hi\"}\n");
/// outcomes.extend(decoder.push_bytes(b"data: [DONE]\n"));
/// assert!(matches!(outcomes.last(), Some(BlockOutcome::Done)));
/// assert_eq!(decoder.finish(), 0);
/// ```
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8ChunkDecoder,
    splitter: FrameSplitter,
    blocks_seen: usize,
}

impl StreamDecoder {
    pub fn new(framing: Framing) -> Self {
        Self {
            utf8: Utf8ChunkDecoder::new(),
            splitter: FrameSplitter::new(framing),
            blocks_seen: 0,
        }
    }

    /// Feed raw bytes from the transport.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<BlockOutcome> {
        let text = self.utf8.decode(bytes);
        self.push_str(&text)
    }

    /// Feed already-decoded text.
    pub fn push_str(&mut self, text: &str) -> Vec<BlockOutcome> {
        let blocks = self.splitter.push(text);
        self.parse_all(blocks)
    }

    /// The body ended. Only complete blocks are ever dispatched, so whatever
    /// is still buffered (a split character, an unterminated line, an
    /// unfinished delimited block) is discarded. Returns the bytes of text
    /// discarded.
    pub fn finish(&mut self) -> usize {
        self.utf8.finish();
        self.splitter.finish()
    }

    /// Number of complete blocks produced so far
    pub fn blocks_seen(&self) -> usize {
        self.blocks_seen
    }

    /// Number of invalid UTF-8 sequences dropped so far
    pub fn decode_errors(&self) -> usize {
        self.utf8.error_count()
    }

    pub fn splitter(&self) -> &FrameSplitter {
        &self.splitter
    }

    fn parse_all(&mut self, blocks: Vec<RawBlock>) -> Vec<BlockOutcome> {
        self.blocks_seen += blocks.len();
        blocks
            .iter()
            .map(parse_block)
            .filter(|outcome| !matches!(outcome, BlockOutcome::Skip))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::ParsedEvent;
    use serde_json::json;

    const DELIMITED: &str = "event: stream\ndata: {\"answer\":\"Hi \"}\n\n\
event: stream\ndata: {\"answer\":\"there\"}\n\n\
event: lookup_answer\ndata: {\"answer\":\"Hi there!\",\"sources\":[{\"title\":\"Doc\",\"url\":\"http://x\"}]}\n\n\
data: [DONE]\n\n";

    fn decode_all(input: &[u8], cuts: &[usize]) -> Vec<BlockOutcome> {
        let mut decoder = StreamDecoder::new(Framing::Auto);
        let mut outcomes = Vec::new();
        let mut start = 0;
        for &cut in cuts.iter().chain(std::iter::once(&input.len())) {
            outcomes.extend(decoder.push_bytes(&input[start..cut]));
            start = cut;
        }
        decoder.finish();
        outcomes
    }

    #[test]
    fn test_full_stream_in_one_chunk() {
        let outcomes = decode_all(DELIMITED.as_bytes(), &[]);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes[0],
            BlockOutcome::Event(ParsedEvent::new("stream", json!({"answer": "Hi "})))
        );
        assert!(matches!(&outcomes[2], BlockOutcome::Event(e) if e.event_type == "lookup_answer"));
        assert_eq!(outcomes[3], BlockOutcome::Done);
    }

    #[test]
    fn test_byte_by_byte_matches_single_chunk() {
        let input = DELIMITED.as_bytes();
        let cuts: Vec<usize> = (1..input.len()).collect();
        assert_eq!(decode_all(input, &cuts), decode_all(input, &[]));
    }

    #[test]
    fn test_legacy_raw_tokens() {
        let input = b"event: stream\ndata: Hel\ndata: lo\nevent: answer\ndata: {\"answer\":\"Hello\"}\ndata: [DONE]\n";
        let outcomes = decode_all(input, &[5, 17, 30]);
        assert_eq!(
            outcomes,
            vec![
                BlockOutcome::Event(ParsedEvent::new("stream", json!({"answer": "Hel"}))),
                BlockOutcome::Event(ParsedEvent::new("stream", json!({"answer": "lo"}))),
                BlockOutcome::Event(ParsedEvent::new("answer", json!({"answer": "Hello"}))),
                BlockOutcome::Done,
            ]
        );
    }

    #[test]
    fn test_skips_are_filtered() {
        let mut decoder = StreamDecoder::new(Framing::Delimited);
        let outcomes = decoder.push_bytes(b"event: ping\n\n: keepalive\n\n");
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_truncated_final_answer_not_dispatched() {
        let mut decoder = StreamDecoder::new(Framing::Delimited);
        let outcomes = decoder.push_bytes(
            b"event: stream\ndata: {\"answer\":\"Hi \"}\n\nevent: lookup_answer\ndata: {\"answer\":\"Hi th",
        );
        assert_eq!(
            outcomes,
            vec![BlockOutcome::Event(ParsedEvent::new("stream", json!({"answer": "Hi "})))]
        );

        assert!(decoder.finish() > 0);
        assert_eq!(decoder.blocks_seen(), 1);
    }

    #[test]
    fn test_split_character_at_end_is_dropped() {
        let mut decoder = StreamDecoder::new(Framing::LineByLine);
        let mut input = b"data: ok\n".to_vec();
        input.extend_from_slice(&"\u{e9}".as_bytes()[..1]);

        assert_eq!(decoder.push_bytes(&input).len(), 1);
        assert_eq!(decoder.finish(), 0);
        assert_eq!(decoder.decode_errors(), 1);
    }
}
