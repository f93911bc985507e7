//! Frame splitter: turns decoded text into complete raw blocks.
//!
//! The upstream service mixes two conventions:
//!
//! - **Delimited** blocks, SSE style: an `event:` line, one or more `data:`
//!   lines, then a blank line.
//! - **Line-by-line**: an `event:` line sets the type for every following
//!   `data:` line until the next `event:` line, and each `data:` line stands
//!   on its own. No blank lines.
//!
//! [`Framing::Auto`] starts out line-by-line and switches to delimited for the
//! rest of the stream once it sees a blank line. Only whole lines drive these
//! decisions, so the blocks produced never depend on where chunks were cut.

use std::fmt;
use std::str::FromStr;

use super::events::{RawBlock, SseLine};
use super::parser::parse_sse_line;
use crate::error::{ChatError, StreamError};

/// Which block convention the splitter applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Line-by-line until the first blank line, delimited afterwards
    #[default]
    Auto,
    /// Blocks end at a blank line (or at the next `event:` line)
    Delimited,
    /// Every `data:` line is its own block; `event:` types are sticky
    LineByLine,
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Framing::Auto => "auto",
            Framing::Delimited => "delimited",
            Framing::LineByLine => "line",
        };
        f.write_str(name)
    }
}

impl FromStr for Framing {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Framing::Auto),
            "delimited" | "sse" => Ok(Framing::Delimited),
            "line" | "lines" | "line-by-line" => Ok(Framing::LineByLine),
            other => Err(ChatError::Config {
                message: format!("unknown framing '{}'", other),
            }),
        }
    }
}

/// Stateful splitter over one response body.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    framing: Framing,
    /// Unterminated tail of the input
    buffer: String,
    /// Complete lines consumed but not yet part of an emitted block
    pending_raw: String,
    event: Option<String>,
    data: Vec<String>,
    saw_blank_line: bool,
}

impl FrameSplitter {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            ..Self::default()
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// The framing currently in effect (never `Auto`)
    pub fn effective_framing(&self) -> Framing {
        match self.framing {
            Framing::Auto if self.saw_blank_line => Framing::Delimited,
            Framing::Auto => Framing::LineByLine,
            other => other,
        }
    }

    /// Append a chunk and return every block it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<RawBlock> {
        self.buffer.push_str(chunk);

        let mut blocks = Vec::new();
        let mut start = 0;
        while let Some(rel) = self.buffer[start..].find('\n') {
            let end = start + rel + 1;
            let line = self.buffer[start..end].to_owned();
            self.consume_line(&line, &mut blocks);
            start = end;
        }
        self.buffer.drain(..start);

        blocks
    }

    /// End of input. Nothing is emitted here: an unterminated last line is
    /// discarded, and so is a delimited block still waiting for its blank
    /// line. Returns the number of bytes discarded.
    ///
    /// Line-by-line blocks are complete at their newline and were already
    /// returned by [`push`](Self::push).
    pub fn finish(&mut self) -> usize {
        let mut discarded = self.buffer.len();
        if !self.data.is_empty() {
            discarded += self.pending_raw.len();
        }

        if discarded > 0 {
            let err = StreamError::Truncated { len: discarded };
            tracing::warn!(
                code = err.error_code(),
                framing = %self.effective_framing(),
                "{}",
                err
            );
        }

        self.buffer.clear();
        self.pending_raw.clear();
        self.data.clear();
        self.event = None;
        discarded
    }

    /// Text consumed from the input that no emitted block accounts for yet.
    ///
    /// Until [`finish`](Self::finish), the concatenation of every emitted
    /// `RawBlock::raw` followed by this value equals everything pushed.
    pub fn buffered(&self) -> String {
        format!("{}{}", self.pending_raw, self.buffer)
    }

    /// Drop all state, e.g. before reusing the splitter for a new body.
    pub fn reset(&mut self) {
        *self = Self::new(self.framing);
    }

    fn consume_line(&mut self, raw_line: &str, blocks: &mut Vec<RawBlock>) {
        let line = raw_line.trim_end_matches('\n').trim_end_matches('\r');

        match parse_sse_line(line) {
            SseLine::Event(event_type) => {
                // A new event line closes whatever block was open.
                self.emit(blocks);
                self.pending_raw.push_str(raw_line);
                self.event = Some(event_type);
            }
            SseLine::Data(data) => {
                self.pending_raw.push_str(raw_line);
                self.data.push(data);
                if self.effective_framing() == Framing::LineByLine {
                    self.emit(blocks);
                }
            }
            SseLine::Empty => {
                self.pending_raw.push_str(raw_line);
                if self.framing == Framing::Auto && !self.saw_blank_line {
                    self.saw_blank_line = true;
                    tracing::debug!("Blank line observed, switching to delimited framing");
                }
                self.emit(blocks);
                if self.effective_framing() == Framing::Delimited {
                    self.event = None;
                }
            }
            SseLine::Comment(_) => {
                self.pending_raw.push_str(raw_line);
            }
        }
    }

    fn emit(&mut self, blocks: &mut Vec<RawBlock>) {
        if self.data.is_empty() {
            return;
        }

        let event = match self.effective_framing() {
            Framing::LineByLine => self.event.clone(),
            _ => self.event.take(),
        };

        blocks.push(RawBlock {
            event,
            data: std::mem::take(&mut self.data),
            raw: std::mem::take(&mut self.pending_raw),
        });
    }
}
