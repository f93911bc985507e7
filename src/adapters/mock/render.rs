//! Render sink that records every callback for later assertions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{ConversationTurn, FollowupPrompt};
use crate::traits::RenderSink;

/// One recorded render callback
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    TurnUpdated {
        turn: ConversationTurn,
        is_final: bool,
    },
    Followup(FollowupPrompt),
    Typing(bool),
    ExchangeFailed(String),
}

/// Records render callbacks in the order they were made.
///
/// Clones share the same log, so a test can keep one handle and pass another
/// to the client.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderSink {
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl RecordingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<RenderCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.log().clone()
    }

    /// Every `on_turn_updated` call as `(turn, is_final)`
    pub fn turn_updates(&self) -> Vec<(ConversationTurn, bool)> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                RenderCall::TurnUpdated { turn, is_final } => Some((turn.clone(), *is_final)),
                _ => None,
            })
            .collect()
    }

    /// Turns rendered as final
    pub fn final_turns(&self) -> Vec<ConversationTurn> {
        self.turn_updates()
            .into_iter()
            .filter_map(|(turn, is_final)| is_final.then_some(turn))
            .collect()
    }

    pub fn followups(&self) -> Vec<FollowupPrompt> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                RenderCall::Followup(prompt) => Some(prompt.clone()),
                _ => None,
            })
            .collect()
    }

    /// Error messages passed to `on_exchange_failed`
    pub fn failures(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                RenderCall::ExchangeFailed(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }
}

impl RenderSink for RecordingRenderSink {
    fn on_turn_updated(&self, turn: &ConversationTurn, is_final: bool) {
        self.log().push(RenderCall::TurnUpdated {
            turn: turn.clone(),
            is_final,
        });
    }

    fn on_followup_prompt(&self, prompt: &FollowupPrompt) {
        self.log().push(RenderCall::Followup(prompt.clone()));
    }

    fn on_typing(&self, active: bool) {
        self.log().push(RenderCall::Typing(active));
    }

    fn on_exchange_failed(&self, message: &str) {
        self.log().push(RenderCall::ExchangeFailed(message.to_string()));
    }
}
