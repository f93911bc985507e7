//! Conversation data model: turns, follow-up prompts, the request body and the
//! transcript.

mod prompt;
mod request;
mod transcript;
mod turn;

pub use prompt::{FollowupChoice, FollowupPrompt};
pub use request::{ChatRequest, RequestMetadata};
pub use transcript::{Transcript, TranscriptExport};
pub use turn::{ConversationTurn, Sender, Source, TurnId};
