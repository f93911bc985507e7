//! docchat - streaming chat core for a hosted documentation assistant
//!
//! Decodes the assistant's SSE-like response stream, dispatches its events
//! into a conversation session and reports every visible change to a render
//! sink. See [`ChatClient`] for the entry point.

pub mod adapters;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod sse;
pub mod state;
pub mod traits;

pub use adapters::{HtmlRenderSink, ReqwestHttpClient};
pub use client::{ChatClient, ExchangeSummary, Submission};
pub use config::ChatConfig;
pub use error::{ChatError, ChatResult};
pub use models::{ConversationTurn, FollowupChoice, FollowupPrompt, Sender, Source, Transcript};
pub use state::{ChatSession, SharedSession};
pub use traits::RenderSink;
