use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::turn::ConversationTurn;
use crate::error::ChatResult;

/// Append-only log of finalized turns, in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Drop every turn. Only an explicit session reset does this.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Take a read-only snapshot for export
    pub fn snapshot(&self, conversation_id: &str) -> TranscriptExport {
        TranscriptExport {
            conversation_id: conversation_id.to_string(),
            exported_at: Utc::now(),
            messages: self.turns.clone(),
        }
    }
}

/// Serializable transcript document handed to export/history collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptExport {
    pub conversation_id: String,
    pub exported_at: DateTime<Utc>,
    pub messages: Vec<ConversationTurn>,
}

impl TranscriptExport {
    pub fn to_json_pretty(&self) -> ChatResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the export as pretty-printed JSON.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> ChatResult<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path.as_ref(), json)?;
        tracing::info!(
            path = %path.as_ref().display(),
            messages = self.messages.len(),
            "Transcript exported"
        );
        Ok(())
    }
}
