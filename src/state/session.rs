//! Conversation session context.
//!
//! One [`ChatSession`] per conversation owns everything that used to be
//! ambient widget state: the conversation id, the transcript, the exchange
//! phase, the streaming answer and any pending follow-up prompt.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::accumulator::AnswerAccumulator;
use super::exchange::{ExchangeOutcome, ExchangePhase, ExchangeState};
use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::{
    ConversationTurn, FollowupChoice, FollowupPrompt, Transcript, TranscriptExport,
};

/// A session shared between the UI side and the exchange task.
///
/// Never hold the lock across an `.await`.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Lock a shared session, recovering the data if a holder panicked.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, ChatSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation_id: String,
    transcript: Transcript,
    exchange: ExchangeState,
    answer: AnswerAccumulator,
    pending_followup: Option<FollowupPrompt>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New session with a fresh conversation id and no token separator.
    pub fn new() -> Self {
        Self {
            conversation_id: Uuid::new_v4().to_string(),
            transcript: Transcript::new(),
            exchange: ExchangeState::new(),
            answer: AnswerAccumulator::new(),
            pending_followup: None,
        }
    }

    /// New session using the token separator from `config`.
    pub fn for_config(config: &ChatConfig) -> Self {
        Self {
            answer: AnswerAccumulator::with_separator(config.token_separator.clone()),
            ..Self::new()
        }
    }

    /// Resume a conversation whose id was persisted elsewhere.
    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = conversation_id.into();
        self
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> ExchangePhase {
        self.exchange.phase()
    }

    pub fn last_outcome(&self) -> Option<ExchangeOutcome> {
        self.exchange.last_outcome()
    }

    pub fn can_submit(&self) -> bool {
        self.exchange.can_submit()
    }

    pub fn answer(&self) -> &AnswerAccumulator {
        &self.answer
    }

    pub fn answer_mut(&mut self) -> &mut AnswerAccumulator {
        &mut self.answer
    }

    pub fn pending_followup(&self) -> Option<&FollowupPrompt> {
        self.pending_followup.as_ref()
    }

    pub fn set_pending_followup(&mut self, prompt: FollowupPrompt) {
        self.pending_followup = Some(prompt);
    }

    /// Start an exchange for `question` and record the user turn.
    ///
    /// Rejected with [`ChatError::ExchangeBusy`] while another exchange is in
    /// flight; nothing is recorded in that case.
    pub fn begin_exchange(&mut self, question: &str) -> ChatResult<ConversationTurn> {
        self.exchange.begin()?;

        self.pending_followup = None;
        if let Some(stale) = self.answer.discard() {
            tracing::warn!(turn_id = %stale.id, "Discarding unfinished bot turn");
        }

        let turn = ConversationTurn::user(question);
        self.transcript.push(turn.clone());
        Ok(turn)
    }

    pub fn mark_streaming(&mut self) -> ChatResult<()> {
        self.exchange.mark_streaming()
    }

    /// Finalize whatever bot turn is active.
    pub fn finalize_active(&mut self) -> Option<ConversationTurn> {
        self.answer.flush_to_transcript(&mut self.transcript)
    }

    /// End the exchange successfully, keeping any provisional answer.
    pub fn complete_exchange(&mut self) -> ChatResult<Option<ConversationTurn>> {
        self.exchange.complete()?;
        Ok(self.finalize_active())
    }

    /// End the exchange as failed. The partial answer is kept as-is.
    pub fn fail_exchange(&mut self) -> ChatResult<Option<ConversationTurn>> {
        self.exchange.fail()?;
        Ok(self.finalize_active())
    }

    /// Resolve the pending follow-up prompt into the label to submit.
    pub fn take_followup_label(&mut self, choice: FollowupChoice) -> ChatResult<String> {
        let prompt = self
            .pending_followup
            .take()
            .ok_or(ChatError::NoFollowupPending)?;
        Ok(prompt.label(choice).to_string())
    }

    /// Start a new conversation: fresh id, empty transcript.
    pub fn reset(&mut self) -> ChatResult<()> {
        if !self.exchange.can_submit() {
            return Err(ChatError::ExchangeBusy {
                phase: self.exchange.phase(),
            });
        }
        let separator = self.answer.separator().to_string();
        *self = Self {
            answer: AnswerAccumulator::with_separator(separator),
            ..Self::new()
        };
        tracing::info!(conversation_id = %self.conversation_id, "Session reset");
        Ok(())
    }

    /// Read-only snapshot of the transcript for export collaborators
    pub fn export(&self) -> TranscriptExport {
        self.transcript.snapshot(&self.conversation_id)
    }
}
