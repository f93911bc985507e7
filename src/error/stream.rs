//! Streaming-related error types.
//!
//! These errors describe problems with the response body once the exchange has
//! started streaming. Most of them are recovered in place: the decoder logs a
//! diagnostic and keeps going. Only a failed read ends the exchange.

use thiserror::Error;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// Reading the next chunk from the response body failed.
    #[error("failed to read response stream: {message}")]
    ReadFailed { message: String },

    /// The transport delivered bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in response stream ({len} byte(s) at offset {offset})")]
    Decode { offset: usize, len: usize },

    /// A `data:` segment could not be decoded as JSON.
    #[error("payload for '{event_type}' event is not JSON: {message}")]
    PayloadParse { event_type: String, message: String },

    /// The producer sent an event type the dispatcher does not handle.
    #[error("unknown event type: {event_type}")]
    UnknownEventType { event_type: String },

    /// The body ended inside an unterminated line or block.
    #[error("response ended mid-block, {len} byte(s) discarded")]
    Truncated { len: usize },
}

impl StreamError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ReadFailed { .. } => "E_STREAM_READ",
            StreamError::Decode { .. } => "E_STREAM_DECODE",
            StreamError::PayloadParse { .. } => "E_STREAM_JSON",
            StreamError::UnknownEventType { .. } => "E_STREAM_UNKNOWN",
            StreamError::Truncated { .. } => "E_STREAM_TRUNCATED",
        }
    }
}
