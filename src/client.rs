//! Chat client driving one request/response exchange at a time.
//!
//! `submit` posts the question, then reads the response body chunk by chunk.
//! Everything between two reads (decoding, parsing, dispatch, rendering) runs
//! synchronously, so events are applied in the order their blocks complete.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use crate::adapters::ReqwestHttpClient;
use crate::config::ChatConfig;
use crate::dispatch::{self, DispatchFlow};
use crate::error::{ChatError, ChatResult, RequestError, StreamError, EXCHANGE_FAILED_MESSAGE};
use crate::models::{ChatRequest, ConversationTurn, FollowupChoice};
use crate::sse::{BlockOutcome, Framing, StreamDecoder};
use crate::state::{lock_session, ExchangePhase, SharedSession};
use crate::traits::{ByteStream, Headers, HttpClient, RenderSink};

/// Parsed outcomes of one response body, in wire order
pub type OutcomeStream = Pin<Box<dyn Stream<Item = Result<BlockOutcome, StreamError>> + Send>>;

/// Turn a response body into a stream of parsed outcomes.
///
/// A failed read is yielded once as [`StreamError::ReadFailed`] and ends the
/// stream. Only complete blocks are yielded: when the body ends, a block cut
/// off mid-way is discarded rather than dispatched.
pub fn decode_stream(body: ByteStream, framing: Framing) -> OutcomeStream {
    let state = (body, StreamDecoder::new(framing), VecDeque::<BlockOutcome>::new(), false);

    let outcomes = stream::unfold(state, |(mut body, mut decoder, mut pending, finished)| async move {
        loop {
            // Hand out what the last chunk produced before reading again
            if let Some(outcome) = pending.pop_front() {
                return Some((Ok(outcome), (body, decoder, pending, finished)));
            }
            if finished {
                return None;
            }

            match body.next().await {
                Some(Ok(chunk)) => {
                    pending.extend(decoder.push_bytes(&chunk));
                }
                Some(Err(e)) => {
                    let err = StreamError::ReadFailed {
                        message: e.to_string(),
                    };
                    return Some((Err(err), (body, decoder, pending, true)));
                }
                None => {
                    let discarded = decoder.finish();
                    tracing::debug!(
                        blocks = decoder.blocks_seen(),
                        decode_errors = decoder.decode_errors(),
                        discarded,
                        "Response body ended"
                    );
                    return None;
                }
            }
        }
    });

    Box::pin(outcomes)
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Blank question; nothing was sent
    Empty,
    /// Another exchange was in flight; nothing was sent or recorded
    Rejected { phase: ExchangePhase },
    /// The exchange ran to completion
    Completed(ExchangeSummary),
}

/// Result of a completed exchange
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeSummary {
    /// Turns added to the transcript by this exchange, user turn first
    pub turns: Vec<ConversationTurn>,
    /// Number of events dispatched
    pub events_dispatched: usize,
    /// Whether the `[DONE]` sentinel was seen (otherwise the body just ended)
    pub saw_done: bool,
}

impl ExchangeSummary {
    /// The last bot turn of the exchange, if any
    pub fn answer(&self) -> Option<&ConversationTurn> {
        self.turns.iter().rev().find(|turn| turn.is_bot())
    }
}

/// Settles the exchange on every exit path.
///
/// If the exchange future is dropped mid-flight (task aborted, caller gave
/// up) the guard finalizes the partial turn and returns the session to
/// `Idle` with a failed outcome.
struct ExchangeGuard<'a> {
    session: &'a SharedSession,
    sink: &'a dyn RenderSink,
    armed: bool,
}

impl<'a> ExchangeGuard<'a> {
    fn new(session: &'a SharedSession, sink: &'a dyn RenderSink) -> Self {
        Self {
            session,
            sink,
            armed: true,
        }
    }

    fn complete(mut self) -> ChatResult<Option<ConversationTurn>> {
        self.armed = false;
        let flushed = lock_session(self.session).complete_exchange()?;
        if let Some(turn) = &flushed {
            self.sink.on_turn_updated(turn, true);
        }
        self.sink.on_typing(false);
        Ok(flushed)
    }

    fn fail(mut self, message: &str) {
        self.armed = false;
        self.settle_failed(Some(message));
    }

    fn settle_failed(&self, message: Option<&str>) {
        let result = lock_session(self.session).fail_exchange();
        match result {
            Ok(Some(turn)) => self.sink.on_turn_updated(&turn, true),
            Ok(None) => {}
            Err(e) => tracing::warn!(code = e.error_code(), "Could not settle exchange: {}", e),
        }
        self.sink.on_typing(false);
        if let Some(message) = message {
            self.sink.on_exchange_failed(message);
        }
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Exchange dropped before completion, keeping partial answer");
            self.settle_failed(None);
        }
    }
}

/// Client for the hosted assistant's streaming chat endpoint.
///
/// # Example
///
/// ```ignore
/// use docchat::{ChatClient, ChatConfig, ChatSession, HtmlRenderSink};
///
/// let config = ChatConfig::from_env()?;
/// let session = ChatSession::for_config(&config).shared();
/// let client = ChatClient::new(config);
/// let sink = HtmlRenderSink::new();
/// client.submit(&session, "How do I reset my router?", &sink).await?;
/// println!("{}", sink.document());
/// ```
pub struct ChatClient<C: HttpClient = ReqwestHttpClient> {
    http: C,
    config: ChatConfig,
}

impl ChatClient<ReqwestHttpClient> {
    /// Client using reqwest for transport
    pub fn new(config: ChatConfig) -> Self {
        Self::with_http_client(config, ReqwestHttpClient::new())
    }
}

impl<C: HttpClient> ChatClient<C> {
    /// Client using any transport (a mock in tests)
    pub fn with_http_client(config: ChatConfig, http: C) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn endpoint_url(&self) -> String {
        self.config.endpoint_url()
    }

    fn stream_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers
    }

    /// Ask a question and stream the answer into `session`, rendering through `sink`.
    ///
    /// Returns `Ok(Submission::Rejected { .. })` without sending anything if
    /// the session already has an exchange in flight. A failed request or a
    /// broken stream is reported to the sink once and returned as an error;
    /// the session is back to `Idle` either way.
    pub async fn submit(
        &self,
        session: &SharedSession,
        question: &str,
        sink: &dyn RenderSink,
    ) -> ChatResult<Submission> {
        self.submit_with_images(session, question, Vec::new(), sink)
            .await
    }

    /// [`submit`](Self::submit) with image URLs attached to the question.
    pub async fn submit_with_images(
        &self,
        session: &SharedSession,
        question: &str,
        image_urls: Vec<String>,
        sink: &dyn RenderSink,
    ) -> ChatResult<Submission> {
        if question.trim().is_empty() {
            return Ok(Submission::Empty);
        }

        let (user_turn, request, first_turn) = {
            let mut session = lock_session(session);
            let user_turn = match session.begin_exchange(question) {
                Ok(turn) => turn,
                Err(ChatError::ExchangeBusy { phase }) => {
                    tracing::info!(%phase, "Exchange in progress, submission rejected");
                    return Ok(Submission::Rejected { phase });
                }
                Err(e) => return Err(e),
            };
            let request = ChatRequest::from_config(&self.config, session.conversation_id(), question)
                .with_image_urls(image_urls);
            (user_turn, request, session.transcript().len() - 1)
        };

        let guard = ExchangeGuard::new(session, sink);
        sink.on_turn_updated(&user_turn, true);
        sink.on_typing(true);

        let payload = serde_json::to_string(&request)?;
        let url = self.config.endpoint_url();
        tracing::info!(
            conversation_id = %request.conversation_id,
            url = %url,
            "Submitting question"
        );

        let body = match self.http.post_stream(&url, &payload, &Self::stream_headers()).await {
            Ok(body) => body,
            Err(e) => {
                let err = RequestError::from(e);
                tracing::error!(code = err.error_code(), status = ?err.status(), "Request failed: {}", err);
                guard.fail(err.user_message());
                return Err(err.into());
            }
        };

        lock_session(session).mark_streaming()?;

        let mut outcomes = decode_stream(body, self.config.framing);
        let mut events_dispatched = 0;
        let mut saw_done = false;

        while let Some(item) = outcomes.next().await {
            let outcome = match item {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(code = err.error_code(), "Stream failed: {}", err);
                    drop(outcomes);
                    guard.fail(EXCHANGE_FAILED_MESSAGE);
                    return Err(err.into());
                }
            };

            if matches!(outcome, BlockOutcome::Event(_)) {
                events_dispatched += 1;
            }
            let action = dispatch::action_for(&outcome);
            let flow = {
                let mut session = lock_session(session);
                dispatch::apply(action, &mut session, sink)
            };
            if flow == DispatchFlow::Terminate {
                saw_done = true;
                break;
            }
        }
        // Release the response body before settling
        drop(outcomes);

        guard.complete()?;

        let turns = lock_session(session).transcript().turns()[first_turn..].to_vec();
        tracing::info!(
            events = events_dispatched,
            turns = turns.len(),
            saw_done,
            "Exchange completed"
        );

        Ok(Submission::Completed(ExchangeSummary {
            turns,
            events_dispatched,
            saw_done,
        }))
    }

    /// Answer the pending follow-up prompt by submitting the chosen label.
    pub async fn choose_followup(
        &self,
        session: &SharedSession,
        choice: FollowupChoice,
        sink: &dyn RenderSink,
    ) -> ChatResult<Submission> {
        let label = {
            let mut session = lock_session(session);
            if !session.can_submit() {
                return Ok(Submission::Rejected {
                    phase: session.phase(),
                });
            }
            session.take_followup_label(choice)?
        };
        tracing::debug!(?choice, "Follow-up chosen");
        self.submit(session, &label, sink).await
    }
}
