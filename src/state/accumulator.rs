//! Answer accumulator for the bot turn that is currently streaming.

use chrono::{DateTime, Utc};

use crate::models::{ConversationTurn, Sender, Source, Transcript, TurnId};

/// The in-progress bot turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTurn {
    pub id: TurnId,
    pub content: String,
    pub sources: Vec<Source>,
    pub started_at: DateTime<Utc>,
    /// Number of stream tokens appended so far
    pub token_count: usize,
}

impl ActiveTurn {
    fn new() -> Self {
        Self {
            id: TurnId::new(),
            content: String::new(),
            sources: Vec::new(),
            started_at: Utc::now(),
            token_count: 0,
        }
    }

    fn to_turn(&self) -> ConversationTurn {
        ConversationTurn {
            id: self.id,
            sender: Sender::Bot,
            content: self.content.clone(),
            timestamp: self.started_at,
            sources: self.sources.clone(),
        }
    }
}

/// Owns the growing answer text and identifies the turn to keep re-rendering.
///
/// Content only ever changes through [`append`](Self::append) (provisional
/// stream tokens) or [`replace`](Self::replace) (authoritative final text).
/// Renders are always derived from the whole accumulated text.
#[derive(Debug, Clone, Default)]
pub struct AnswerAccumulator {
    active: Option<ActiveTurn>,
    separator: String,
}

impl AnswerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator that inserts `separator` between consecutive tokens.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            active: None,
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveTurn> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<TurnId> {
        self.active.as_ref().map(|turn| turn.id)
    }

    /// Text accumulated for the active turn ("" when there is none)
    pub fn current_answer(&self) -> &str {
        self.active
            .as_ref()
            .map(|turn| turn.content.as_str())
            .unwrap_or("")
    }

    /// Append a stream token, creating the active turn on the first one.
    ///
    /// Returns false (and changes nothing) for an empty token.
    pub fn append(&mut self, delta: &str) -> bool {
        if delta.is_empty() {
            return false;
        }

        let separator = &self.separator;
        let turn = self.active.get_or_insert_with(ActiveTurn::new);
        if !turn.content.is_empty() && !separator.is_empty() {
            turn.content.push_str(separator);
        }
        turn.content.push_str(delta);
        turn.token_count += 1;
        true
    }

    /// Overwrite the active turn's content, creating the turn if needed.
    pub fn replace(&mut self, text: &str) {
        let turn = self.active.get_or_insert_with(ActiveTurn::new);
        turn.content.clear();
        turn.content.push_str(text);
    }

    /// Attach sources to the active turn. No-op without one.
    pub fn set_sources(&mut self, sources: Vec<Source>) {
        if let Some(turn) = self.active.as_mut() {
            turn.sources = sources;
        }
    }

    /// The active turn as it currently stands, for rendering
    pub fn snapshot(&self) -> Option<ConversationTurn> {
        self.active.as_ref().map(ActiveTurn::to_turn)
    }

    /// Finalize the active turn into `transcript` and clear the pointer.
    ///
    /// Returns the finalized turn, or `None` (and does nothing) when no turn
    /// is active.
    pub fn flush_to_transcript(&mut self, transcript: &mut Transcript) -> Option<ConversationTurn> {
        let active = self.active.take()?;
        let turn = active.to_turn();
        tracing::debug!(
            turn_id = %turn.id,
            tokens = active.token_count,
            chars = turn.content.len(),
            "Finalized bot turn"
        );
        transcript.push(turn.clone());
        Some(turn)
    }

    /// Drop the active turn without finalizing it.
    pub fn discard(&mut self) -> Option<ActiveTurn> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_active_turn() {
        let mut acc = AnswerAccumulator::new();
        assert!(!acc.is_active());

        assert!(acc.append("Hel"));
        let id = acc.active_id();
        assert!(id.is_some());

        assert!(acc.append("lo"));
        assert_eq!(acc.current_answer(), "Hello");
        assert_eq!(acc.active_id(), id);
        assert_eq!(acc.active().map(|t| t.token_count), Some(2));
    }

    #[test]
    fn test_separator_between_tokens_only() {
        let mut acc = AnswerAccumulator::with_separator(" ");
        acc.append("Hi");
        acc.append("there");
        assert_eq!(acc.current_answer(), "Hi there");
    }

    #[test]
    fn test_empty_token_ignored() {
        let mut acc = AnswerAccumulator::with_separator(" ");
        assert!(!acc.append(""));
        assert!(!acc.is_active());

        acc.append("a");
        assert!(!acc.append(""));
        assert_eq!(acc.current_answer(), "a");
    }

    #[test]
    fn test_replace_overwrites_streamed_text() {
        let mut acc = AnswerAccumulator::new();
        acc.append("Hel");
        acc.append("lo");
        let id = acc.active_id();

        acc.replace("Goodbye");
        assert_eq!(acc.current_answer(), "Goodbye");
        assert_eq!(acc.active_id(), id);
    }

    #[test]
    fn test_replace_without_active_turn_creates_one() {
        let mut acc = AnswerAccumulator::new();
        acc.replace("standalone");
        assert_eq!(acc.current_answer(), "standalone");
    }

    #[test]
    fn test_flush_moves_turn_into_transcript() {
        let mut acc = AnswerAccumulator::new();
        let mut transcript = Transcript::new();

        acc.append("Hi");
        acc.set_sources(vec![Source::new("Doc", Some("http://x".to_string()))]);
        let id = acc.active_id();

        let turn = acc.flush_to_transcript(&mut transcript).unwrap();
        assert_eq!(Some(turn.id), id);
        assert_eq!(turn.content, "Hi");
        assert_eq!(turn.sender, Sender::Bot);
        assert_eq!(turn.sources.len(), 1);

        assert!(!acc.is_active());
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last(), Some(&turn));
    }

    #[test]
    fn test_flush_without_active_turn_is_noop() {
        let mut acc = AnswerAccumulator::new();
        let mut transcript = Transcript::new();
        assert!(acc.flush_to_transcript(&mut transcript).is_none());
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_set_sources_without_active_turn_is_noop() {
        let mut acc = AnswerAccumulator::new();
        acc.set_sources(vec![Source::new("Doc", None)]);
        assert!(acc.snapshot().is_none());
    }

    #[test]
    fn test_snapshot_is_stable_for_same_text() {
        let mut acc = AnswerAccumulator::new();
        acc.append("same");
        assert_eq!(acc.snapshot(), acc.snapshot());
    }
}
