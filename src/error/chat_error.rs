//! Unified error type for the chat core.

use thiserror::Error;

use super::{RequestError, StreamError};
use crate::state::ExchangePhase;

/// Result type alias used across the crate.
pub type ChatResult<T> = Result<T, ChatError>;

/// Every error the chat core can return.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request failed before streaming began.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The response stream failed after it started.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A submission arrived while another exchange was in flight.
    #[error("an exchange is already in progress ({phase})")]
    ExchangeBusy { phase: ExchangePhase },

    /// The exchange state machine was asked to make an illegal move.
    #[error("invalid exchange transition from {from} to {to}")]
    InvalidTransition { from: ExchangePhase, to: ExchangePhase },

    /// A follow-up choice was made with no prompt pending.
    #[error("no follow-up prompt is pending")]
    NoFollowupPending,

    /// Configuration could not be loaded or applied.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure (transcript export).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Request(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::ExchangeBusy { .. } => "E_EXCHANGE_BUSY",
            ChatError::InvalidTransition { .. } => "E_EXCHANGE_STATE",
            ChatError::NoFollowupPending => "E_NO_FOLLOWUP",
            ChatError::Config { .. } => "E_CONFIG",
            ChatError::Json(_) => "E_JSON",
            ChatError::Io(_) => "E_IO",
        }
    }

    /// Whether this error ended an exchange that had been started.
    pub fn is_exchange_failure(&self) -> bool {
        matches!(self, ChatError::Request(_) | ChatError::Stream(_))
    }
}
