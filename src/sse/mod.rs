//! SSE-like stream decoding.
//!
//! The hosted assistant answers with a text stream made of:
//! - `event: <type>` - event type line
//! - `data: <payload>` - JSON or plain-text payload line
//! - Empty line - ends a block (only in delimited framing)
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `decoder` - incremental UTF-8 decoding across chunk boundaries
//! - `splitter` - line buffering and block framing ([`Framing`])
//! - `parser` - line and block parsing, payload fallback
//! - `payloads` - typed views over decoded payloads
//! - `events` - wire-level types
//! - `stream` - the whole pipeline ([`StreamDecoder`])

mod decoder;
mod events;
mod parser;
pub(crate) mod payloads;
mod splitter;
mod stream;

pub use decoder::Utf8ChunkDecoder;
pub use events::{
    BlockOutcome, EventKind, ParsedEvent, RawBlock, SseLine, DEFAULT_EVENT_TYPE, DONE_SENTINEL,
};
pub use parser::{decode_payload, parse_block, parse_sse_line};
pub use splitter::{FrameSplitter, Framing};
pub use stream::StreamDecoder;
