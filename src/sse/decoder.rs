//! Incremental UTF-8 decoding of response chunks.
//!
//! The transport may cut a multi-byte character in half. Incomplete trailing
//! bytes are held back until the next chunk completes them; bytes that can
//! never form valid UTF-8 are dropped with a diagnostic.

use crate::error::StreamError;

#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    /// Bytes received but not yet decoded (at most one incomplete sequence
    /// between calls)
    pending: Vec<u8>,
    /// Total bytes consumed so far, for error offsets
    consumed: usize,
    /// Number of invalid sequences dropped
    errors: usize,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` (plus any held-back tail) as possible.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut pos = 0;

        while pos < self.pending.len() {
            match std::str::from_utf8(&self.pending[pos..]) {
                Ok(text) => {
                    out.push_str(text);
                    pos = self.pending.len();
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[pos..pos + valid]));
                    pos += valid;

                    match err.error_len() {
                        Some(len) => {
                            self.report(self.consumed + pos, len);
                            pos += len;
                        }
                        // Incomplete sequence at the end: wait for more bytes
                        None => break,
                    }
                }
            }
        }

        self.consumed += pos;
        self.pending.drain(..pos);
        out
    }

    /// End of stream. A held-back partial sequence can no longer be completed
    /// and is dropped; returns how many bytes that was.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        if dropped > 0 {
            self.report(self.consumed, dropped);
            self.consumed += dropped;
            self.pending.clear();
        }
        dropped
    }

    /// Bytes waiting for the rest of their character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    fn report(&mut self, offset: usize, len: usize) {
        self.errors += 1;
        let err = StreamError::Decode { offset, len };
        tracing::warn!(code = err.error_code(), "{}", err);
    }
}
