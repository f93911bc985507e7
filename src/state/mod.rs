//! Conversation state
//!
//! - `accumulator` - the growing answer of the active bot turn
//! - `exchange` - the request/response state machine
//! - `session` - per-conversation context tying both to the transcript

mod accumulator;
mod exchange;
mod session;

pub use accumulator::{ActiveTurn, AnswerAccumulator};
pub use exchange::{ExchangeOutcome, ExchangePhase, ExchangeState};
pub use session::{lock_session, ChatSession, SharedSession};
