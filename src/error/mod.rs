//! Error handling for the chat core.
//!
//! | Error | Raised when | Effect on the exchange |
//! |-------|-------------|------------------------|
//! | [`RequestError`] | non-2xx status or network failure before streaming | fatal, reported once, no retry |
//! | [`StreamError::ReadFailed`] | the body read fails mid-stream | fatal, partial turn kept |
//! | [`StreamError::Decode`] | malformed UTF-8 from the transport | recovered |
//! | [`StreamError::PayloadParse`] | non-JSON `data:` segment | recovered via raw-text fallback |
//! | [`StreamError::UnknownEventType`] | unrecognized event type | ignored |
//! | [`StreamError::Truncated`] | body ends inside a line or block | fragment discarded |

mod chat_error;
mod request;
mod stream;

pub use chat_error::{ChatError, ChatResult};
pub use request::{RequestError, EXCHANGE_FAILED_MESSAGE};
pub use stream::StreamError;
