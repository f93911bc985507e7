//! SSE payload deserialization structs
//!
//! Typed views over the decoded payload of an event. Extraction is tolerant:
//! a malformed `sources` or `options` field is dropped on its own and never
//! costs us the `answer` text.

use serde::Deserialize;
use serde_json::Value;

use crate::models::Source;

/// One cited source as the server sends it
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SourcePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<SourcePayload> for Source {
    fn from(payload: SourcePayload) -> Self {
        Source::new(payload.title.unwrap_or_default(), payload.url)
    }
}

/// Follow-up button labels on an `is_resolved_question` event
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OptionsPayload {
    pub yes: String,
    pub no: String,
}

/// Fields the dispatcher cares about
#[derive(Debug, Clone, Default)]
pub(crate) struct AnswerPayload {
    pub answer: Option<String>,
    pub sources: Option<Vec<Source>>,
    pub options: Option<OptionsPayload>,
}

impl AnswerPayload {
    pub fn extract(payload: &Value) -> Self {
        let answer = payload
            .get("answer")
            .and_then(Value::as_str)
            .map(str::to_string);

        let sources = match payload.get("sources") {
            None | Some(Value::Null) => None,
            Some(value) => match Vec::<SourcePayload>::deserialize(value) {
                Ok(list) => Some(list.into_iter().map(Source::from).collect()),
                Err(e) => {
                    tracing::warn!("Ignoring malformed sources: {}", e);
                    None
                }
            },
        };

        let options = match payload.get("options") {
            None | Some(Value::Null) => None,
            Some(value) => match OptionsPayload::deserialize(value) {
                Ok(options) => Some(options),
                Err(e) => {
                    tracing::warn!("Ignoring malformed follow-up options: {}", e);
                    None
                }
            },
        };

        Self {
            answer,
            sources,
            options,
        }
    }
}
