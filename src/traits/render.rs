//! Render callback interface.
//!
//! The chat core never produces markup. Every visible change is reported to a
//! [`RenderSink`] as plain data: the whole turn as it currently stands, or a
//! follow-up prompt object. The sink owns materialization and sanitization.

use crate::models::{ConversationTurn, FollowupPrompt};

/// Receiver for visible conversation updates.
///
/// Callbacks run synchronously on the exchange task between two reads of the
/// response body, so implementations should return quickly.
pub trait RenderSink: Send + Sync {
    /// A turn was created or changed.
    ///
    /// `turn.content` is always the full accumulated text, so re-rendering from
    /// it is idempotent. `is_final` is true once the turn will not change again.
    fn on_turn_updated(&self, turn: &ConversationTurn, is_final: bool);

    /// The assistant asked a yes/no follow-up question.
    fn on_followup_prompt(&self, prompt: &FollowupPrompt);

    /// The assistant started or stopped "typing".
    fn on_typing(&self, _active: bool) {}

    /// The exchange failed; `message` is the one user-visible error line.
    fn on_exchange_failed(&self, _message: &str) {}
}
