//! Event classification and dispatch.
//!
//! [`classify`] is a pure mapping from a parsed event to an [`Action`];
//! [`apply`] performs that action against the session and reports every
//! visible change to the render sink. Keeping the two apart lets the mapping
//! be tested without any state.

use crate::error::StreamError;
use crate::models::{FollowupPrompt, Source};
use crate::sse::payloads::AnswerPayload;
use crate::sse::{BlockOutcome, EventKind, ParsedEvent};
use crate::state::ChatSession;
use crate::traits::RenderSink;

/// What an event asks the core to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `stream`: append a provisional token to the active turn
    AppendToken(String),
    /// `lookup_answer`: authoritative final text plus optional sources
    FinalAnswer {
        text: String,
        sources: Option<Vec<Source>>,
    },
    /// `answer`: standalone final text
    PlainAnswer(String),
    /// `is_resolved_question`: final text and maybe a yes/no prompt
    ResolvedQuestion {
        text: String,
        prompt: Option<FollowupPrompt>,
    },
    /// End-of-stream sentinel
    Terminate,
    /// Nothing to do
    Ignore,
}

/// Whether the exchange should keep reading after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchFlow {
    Continue,
    Terminate,
}

/// Map a parsed event onto an action. Never fails.
pub fn classify(event: &ParsedEvent) -> Action {
    let kind = event.kind();
    let payload = AnswerPayload::extract(&event.payload);

    let Some(text) = payload.answer else {
        match kind {
            EventKind::Other(_) => log_unknown(&event.event_type),
            _ => tracing::debug!(
                event_type = %event.event_type,
                "Event without a string answer, ignoring"
            ),
        }
        return Action::Ignore;
    };

    match kind {
        EventKind::Stream if text.is_empty() => Action::Ignore,
        EventKind::Stream => Action::AppendToken(text),
        EventKind::LookupAnswer => Action::FinalAnswer {
            text,
            sources: payload.sources,
        },
        EventKind::Answer => Action::PlainAnswer(text),
        EventKind::IsResolvedQuestion => {
            let prompt = payload
                .options
                .map(|options| FollowupPrompt::new(text.clone(), options.yes, options.no));
            Action::ResolvedQuestion { text, prompt }
        }
        EventKind::Other(event_type) => {
            log_unknown(&event_type);
            Action::Ignore
        }
    }
}

/// Map any parser outcome onto an action
pub fn action_for(outcome: &BlockOutcome) -> Action {
    match outcome {
        BlockOutcome::Event(event) => classify(event),
        BlockOutcome::Done => Action::Terminate,
        BlockOutcome::Skip => Action::Ignore,
    }
}

/// Apply an action to the session, rendering through `sink`.
///
/// The sink is called while the caller holds the session, so it must not try
/// to lock the session itself.
pub fn apply(action: Action, session: &mut ChatSession, sink: &dyn RenderSink) -> DispatchFlow {
    match action {
        Action::AppendToken(token) => {
            let answer = session.answer_mut();
            if answer.append(&token) {
                if let Some(turn) = answer.snapshot() {
                    sink.on_turn_updated(&turn, false);
                }
            }
        }
        Action::FinalAnswer { text, sources } => {
            finalize(session, sink, &text, sources);
        }
        Action::PlainAnswer(text) => {
            finalize(session, sink, &text, None);
        }
        Action::ResolvedQuestion { text, prompt } => {
            // The prompt is its own turn; a streamed answer stays as it is.
            if let Some(turn) = session.finalize_active() {
                sink.on_turn_updated(&turn, true);
            }
            finalize(session, sink, &text, None);
            if let Some(prompt) = prompt {
                sink.on_followup_prompt(&prompt);
                session.set_pending_followup(prompt);
            }
        }
        Action::Terminate => return DispatchFlow::Terminate,
        Action::Ignore => {}
    }
    DispatchFlow::Continue
}

/// Classify and apply in one step.
pub fn dispatch(event: &ParsedEvent, session: &mut ChatSession, sink: &dyn RenderSink) -> DispatchFlow {
    apply(classify(event), session, sink)
}

// Terminal text is authoritative: it overwrites whatever was streamed.
fn finalize(
    session: &mut ChatSession,
    sink: &dyn RenderSink,
    text: &str,
    sources: Option<Vec<Source>>,
) {
    let answer = session.answer_mut();
    answer.replace(text);
    if let Some(sources) = sources {
        answer.set_sources(sources);
    }

    if let Some(turn) = session.finalize_active() {
        sink.on_typing(false);
        sink.on_turn_updated(&turn, true);
    }
}

fn log_unknown(event_type: &str) {
    let err = StreamError::UnknownEventType {
        event_type: event_type.to_string(),
    };
    tracing::debug!(code = err.error_code(), "{}", err);
}
