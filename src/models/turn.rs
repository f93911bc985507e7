use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one turn and, while it streams, its render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A document the assistant cited for its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Source {
    pub fn new(title: impl Into<String>, url: Option<String>) -> Self {
        Self {
            title: title.into(),
            url,
        }
    }
}

/// One logical message in the conversation.
///
/// Bot turns are built up by the answer accumulator while they stream and are
/// only copied into a `ConversationTurn` for rendering or once finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: TurnId,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl ConversationTurn {
    /// Create a user turn stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            sender: Sender::User,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    /// Create a bot turn stamped with the current time
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            sender: Sender::Bot,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_ids_are_unique() {
        assert_ne!(TurnId::new(), TurnId::new());
    }

    #[test]
    fn test_user_and_bot_constructors() {
        let user = ConversationTurn::user("hi");
        assert_eq!(user.sender, Sender::User);
        assert!(!user.is_bot());

        let bot = ConversationTurn::bot("hello");
        assert_eq!(bot.sender, Sender::Bot);
        assert!(bot.sources.is_empty());
    }

    #[test]
    fn test_serialization_skips_empty_sources() {
        let turn = ConversationTurn::bot("plain");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["sender"], "bot");
        assert!(json.get("sources").is_none());

        let turn = turn.with_sources(vec![Source::new("Doc", Some("http://x".to_string()))]);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["sources"][0]["title"], "Doc");
        assert_eq!(json["sources"][0]["url"], "http://x");
    }

    #[test]
    fn test_source_without_url_round_trips() {
        let source: Source = serde_json::from_str(r#"{"title":"Offline PDF"}"#).unwrap();
        assert_eq!(source.url, None);
        assert_eq!(serde_json::to_string(&source).unwrap(), r#"{"title":"Offline PDF"}"#);
    }
}
