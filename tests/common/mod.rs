//! Common test utilities for integration tests.
//!
//! Wire fixtures, client builders and small async helpers shared by the
//! stream, exchange and HTTP tests.
#![allow(dead_code)]

use std::time::Duration;

use bytes::Bytes;
use docchat::adapters::mock::{MockHttpClient, MockResponse};
use docchat::config::ChatConfig;
use docchat::sse::{BlockOutcome, Framing, StreamDecoder};
use docchat::state::{lock_session, ChatSession, ExchangePhase, SharedSession};
use docchat::ChatClient;

pub const TEAM_ID: &str = "team-test";
pub const BOT_ID: &str = "bot-test";

/// The canonical exchange: two stream tokens, the final answer with one
/// source, then the end-of-stream sentinel. Blank-line delimited.
pub const HI_THERE_STREAM: &str = "event: stream\ndata: {\"answer\":\"Hi \"}\n\n\
event: stream\ndata:{\"answer\":\"there\"}\n\n\
event: lookup_answer\ndata:{\"answer\":\"Hi there!\",\"sources\":[{\"title\":\"Doc\",\"url\":\"http://x\"}]}\n\n\
data: [DONE]\n\n";

/// Legacy framing: sticky event types, no blank lines, plain-text tokens.
pub const LEGACY_STREAM: &str = "event: stream\ndata: Hel\ndata: lo\n\
event: lookup_answer\ndata: {\"answer\":\"Goodbye\"}\ndata: [DONE]\n";

/// Multi-byte text, CRLF line endings, comments and an unknown event type.
pub const MIXED_STREAM: &str = ": keep-alive\r\n\r\n\
event: stream\r\ndata: {\"answer\":\"Caf\u{e9} \"}\r\n\r\n\
event: telemetry\r\ndata: {\"tokens\":12}\r\n\r\n\
event: stream\r\ndata: {\"answer\":\"\u{2615}\u{1F600}\"}\r\n\r\n\
event: answer\r\ndata: not-json\r\n\r\n\
data: [DONE]\r\n\r\n";

/// Final answer followed by a resolved-question prompt.
pub const FOLLOWUP_STREAM: &str = "event: lookup_answer\ndata: {\"answer\":\"Restart it.\"}\n\n\
event: is_resolved_question\ndata: {\"answer\":\"Did that answer your question?\",\"options\":{\"yes\":\"Yes, thanks\",\"no\":\"No, I need more help\"}}\n\n\
data: [DONE]\n\n";

pub fn test_config(api_base: &str) -> ChatConfig {
    ChatConfig::new(TEAM_ID, BOT_ID).with_api_base(api_base)
}

/// A client whose transport replays `response` for every request
pub fn mock_client(response: MockResponse) -> ChatClient<MockHttpClient> {
    mock_client_with(test_config("http://mock.local"), response)
}

pub fn mock_client_with(config: ChatConfig, response: MockResponse) -> ChatClient<MockHttpClient> {
    ChatClient::with_http_client(config, MockHttpClient::with_default(response))
}

pub fn new_session() -> SharedSession {
    ChatSession::new().shared()
}

/// Body split into one chunk per fixture
pub fn chunks(parts: &[&str]) -> Vec<Bytes> {
    parts.iter().map(|p| Bytes::copy_from_slice(p.as_bytes())).collect()
}

/// Split `input` at the given byte offsets (unsorted and duplicates allowed)
pub fn split_at_offsets(input: &[u8], offsets: &[usize]) -> Vec<Bytes> {
    let mut cuts: Vec<usize> = offsets.iter().map(|&o| o.min(input.len())).collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(input.len())) {
        pieces.push(Bytes::copy_from_slice(&input[start..cut]));
        start = cut;
    }
    pieces
}

/// Run pieces through a fresh decoder, then end the body
pub fn decode_pieces(pieces: &[Bytes], framing: Framing) -> Vec<BlockOutcome> {
    let mut decoder = StreamDecoder::new(framing);
    let mut outcomes = Vec::new();
    for piece in pieces {
        outcomes.extend(decoder.push_bytes(piece));
    }
    decoder.finish();
    outcomes
}

/// Poll until the session satisfies `condition`, failing after two seconds.
pub async fn wait_until<F>(session: &SharedSession, condition: F)
where
    F: Fn(&ChatSession) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if condition(&lock_session(session)) {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for session condition"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub async fn wait_for_phase(session: &SharedSession, phase: ExchangePhase) {
    wait_until(session, |s| s.phase() == phase).await;
}
