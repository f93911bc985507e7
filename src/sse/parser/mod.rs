//! Block parsing.
//!
//! Turns a single line into an [`SseLine`] and a complete [`RawBlock`] into a
//! [`BlockOutcome`]: a typed event, the end-of-stream sentinel, or nothing.

mod payload;

use crate::sse::events::{
    BlockOutcome, ParsedEvent, RawBlock, SseLine, DEFAULT_EVENT_TYPE, DONE_SENTINEL,
};

pub use payload::decode_payload;

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // Unknown line format - treat as comment
    SseLine::Comment(line.to_string())
}

/// Parse one complete block.
///
/// - no `data:` line → [`BlockOutcome::Skip`]
/// - data equal to `[DONE]` → [`BlockOutcome::Done`]
/// - otherwise an event whose type defaults to `"message"` and whose payload
///   is decoded by [`decode_payload`]
pub fn parse_block(block: &RawBlock) -> BlockOutcome {
    if block.data.is_empty() {
        return BlockOutcome::Skip;
    }

    let event_type = block
        .event
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_EVENT_TYPE);

    let text = block.data.join("\n");
    if text == DONE_SENTINEL {
        tracing::debug!("End-of-stream sentinel received");
        return BlockOutcome::Done;
    }

    let payload = decode_payload(event_type, &text);
    BlockOutcome::Event(ParsedEvent::new(event_type, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(event: Option<&str>, data: &[&str]) -> RawBlock {
        RawBlock {
            event: event.map(str::to_string),
            data: data.iter().map(|d| d.to_string()).collect(),
            raw: String::new(),
        }
    }

    // Tests for parse_sse_line

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(
            parse_sse_line(": this is a comment"),
            SseLine::Comment("this is a comment".to_string())
        );
        assert_eq!(
            parse_sse_line(":no space"),
            SseLine::Comment("no space".to_string())
        );
    }

    #[test]
    fn test_parse_event_line() {
        assert_eq!(
            parse_sse_line("event: stream"),
            SseLine::Event("stream".to_string())
        );
        assert_eq!(
            parse_sse_line("event:lookup_answer"),
            SseLine::Event("lookup_answer".to_string())
        );
        assert_eq!(
            parse_sse_line("event:   answer  "),
            SseLine::Event("answer".to_string())
        );
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line("data: {\"answer\": \"hello\"}"),
            SseLine::Data("{\"answer\": \"hello\"}".to_string())
        );
        assert_eq!(
            parse_sse_line("data:{\"x\":1}"),
            SseLine::Data("{\"x\":1}".to_string())
        );
        assert_eq!(parse_sse_line("data:   Hi   "), SseLine::Data("Hi".to_string()));
    }

    #[test]
    fn test_parse_unknown_line() {
        assert_eq!(
            parse_sse_line("unknown: something"),
            SseLine::Comment("unknown: something".to_string())
        );
    }

    // Tests for parse_block

    #[test]
    fn test_default_event_type() {
        let outcome = parse_block(&block(None, &[r#"{"answer":"x"}"#]));
        assert_eq!(
            outcome,
            BlockOutcome::Event(ParsedEvent::new("message", json!({"answer": "x"})))
        );

        let outcome = parse_block(&block(Some(""), &[r#"{"answer":"x"}"#]));
        match outcome {
            BlockOutcome::Event(event) => assert_eq!(event.event_type, "message"),
            other => panic!("Expected event, got {:?}", other),
        }
    }

    #[test]
    fn test_done_sentinel() {
        assert_eq!(parse_block(&block(None, &["[DONE]"])), BlockOutcome::Done);
        assert_eq!(
            parse_block(&block(Some("stream"), &["[DONE]"])),
            BlockOutcome::Done
        );
    }

    #[test]
    fn test_no_data_is_skipped() {
        assert_eq!(parse_block(&block(Some("ping"), &[])), BlockOutcome::Skip);
    }

    #[test]
    fn test_not_json_falls_back_to_answer() {
        let outcome = parse_block(&block(Some("answer"), &["not-json"]));
        match outcome {
            BlockOutcome::Event(event) => {
                assert_eq!(event.event_type, "answer");
                assert_eq!(event.answer(), Some("not-json"));
            }
            other => panic!("Expected event, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_data_lines_joined_with_newline() {
        let outcome = parse_block(&block(
            Some("lookup_answer"),
            &[r#"{"answer":"#, r#""multi","sources":[]}"#],
        ));
        match outcome {
            BlockOutcome::Event(event) => {
                assert_eq!(event.answer(), Some("multi"));
                assert_eq!(event.payload["sources"], json!([]));
            }
            other => panic!("Expected event, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_plain_lines_keep_newlines() {
        let outcome = parse_block(&block(Some("answer"), &["first line", "second line"]));
        match outcome {
            BlockOutcome::Event(event) => {
                assert_eq!(event.answer(), Some("first line\nsecond line"))
            }
            other => panic!("Expected event, got {:?}", other),
        }
    }
}
