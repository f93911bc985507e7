//! Payload decoding with the raw-text fallback.

use serde_json::{json, Value};

use crate::error::StreamError;

/// Decode the text of a block's data segment.
///
/// A JSON object is returned as-is. A JSON string is unwrapped into
/// `{"answer": <string>}`. Anything else (other JSON scalars, arrays, or text
/// that is not JSON at all) becomes `{"answer": <raw text>}` so that plain-text
/// tokens are never dropped.
pub fn decode_payload(event_type: &str, text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(Value::String(answer)) => json!({ "answer": answer }),
        Ok(other) => {
            tracing::debug!(
                event_type,
                kind = json_kind(&other),
                "Non-object JSON payload, using raw text"
            );
            json!({ "answer": text })
        }
        Err(e) => {
            let err = StreamError::PayloadParse {
                event_type: event_type.to_string(),
                message: e.to_string(),
            };
            tracing::debug!(code = err.error_code(), "{}; using raw text", err);
            json!({ "answer": text })
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_passes_through() {
        let value = decode_payload(
            "lookup_answer",
            r#"{"answer":"Hi","sources":[{"title":"Doc","url":"http://x"}]}"#,
        );
        assert_eq!(value["answer"], "Hi");
        assert_eq!(value["sources"][0]["title"], "Doc");
    }

    #[test]
    fn test_plain_text_fallback() {
        assert_eq!(decode_payload("stream", "Hello"), json!({"answer": "Hello"}));
        assert_eq!(decode_payload("answer", "not-json"), json!({"answer": "not-json"}));
    }

    #[test]
    fn test_json_string_is_unwrapped() {
        assert_eq!(decode_payload("stream", r#""Hi ""#), json!({"answer": "Hi "}));
    }

    #[test]
    fn test_scalar_json_keeps_raw_text() {
        assert_eq!(decode_payload("stream", "42"), json!({"answer": "42"}));
        assert_eq!(decode_payload("stream", "true"), json!({"answer": "true"}));
        assert_eq!(decode_payload("stream", "null"), json!({"answer": "null"}));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(decode_payload("stream", ""), json!({"answer": ""}));
    }
}
