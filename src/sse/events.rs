//! Wire-level types produced by the splitter and the block parser.

use serde_json::Value;

/// Event type used when a block carries no `event:` line.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// Payload text that marks the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: stream")
    Event(String),
    /// Data payload (e.g., "data: {\"answer\": \"hi\"}")
    Data(String),
    /// Empty line - terminates a block in delimited framing
    Empty,
    /// Comment line (starts with ':') or a line we do not understand
    Comment(String),
}

/// One complete unit of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawBlock {
    /// Value of the `event:` line in effect for this block, if any
    pub event: Option<String>,
    /// Contents of each `data:` line, prefix and surrounding whitespace removed
    pub data: Vec<String>,
    /// Every byte of text consumed to produce this block, line endings included
    pub raw: String,
}

/// A block classified by type, with its payload decoded.
///
/// `payload` is the JSON object the server sent, or `{"answer": <text>}` when
/// the data segment was plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub event_type: String,
    pub payload: Value,
}

impl ParsedEvent {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// The `answer` field, when it is a string
    pub fn answer(&self) -> Option<&str> {
        self.payload.get("answer").and_then(Value::as_str)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from_type(&self.event_type)
    }
}

/// Result of parsing one raw block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome {
    /// A dispatchable event
    Event(ParsedEvent),
    /// The `[DONE]` sentinel: the exchange is over
    Done,
    /// Nothing to dispatch (no `data:` line)
    Skip,
}

/// Event types the dispatcher knows how to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Incremental answer token
    Stream,
    /// Final answer with optional sources
    LookupAnswer,
    /// Standalone answer
    Answer,
    /// "Did this resolve your question?" prompt
    IsResolvedQuestion,
    /// Anything else; ignored
    Other(String),
}

impl EventKind {
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "stream" => EventKind::Stream,
            "lookup_answer" => EventKind::LookupAnswer,
            "answer" => EventKind::Answer,
            "is_resolved_question" => EventKind::IsResolvedQuestion,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// Returns the wire name of this event type.
    pub fn event_type_name(&self) -> &str {
        match self {
            EventKind::Stream => "stream",
            EventKind::LookupAnswer => "lookup_answer",
            EventKind::Answer => "answer",
            EventKind::IsResolvedQuestion => "is_resolved_question",
            EventKind::Other(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_round_trip_names() {
        for name in ["stream", "lookup_answer", "answer", "is_resolved_question", "ping"] {
            assert_eq!(EventKind::from_type(name).event_type_name(), name);
        }
        assert_eq!(
            EventKind::from_type("ping"),
            EventKind::Other("ping".to_string())
        );
    }

    #[test]
    fn test_parsed_event_answer_accessor() {
        let event = ParsedEvent::new("stream", json!({"answer": "Hi"}));
        assert_eq!(event.answer(), Some("Hi"));
        assert_eq!(event.kind(), EventKind::Stream);

        let event = ParsedEvent::new("stream", json!({"answer": 42}));
        assert_eq!(event.answer(), None);

        let event = ParsedEvent::new("stream", json!({"text": "Hi"}));
        assert_eq!(event.answer(), None);
    }
}
