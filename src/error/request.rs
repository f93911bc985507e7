//! Request-level error types.
//!
//! A request error happens before the response starts streaming: the server
//! answered with a non-success status or could not be reached at all. These
//! are fatal to the exchange and are never retried.

use thiserror::Error;

use crate::traits::HttpError;

/// Text shown to the user when an exchange fails.
pub const EXCHANGE_FAILED_MESSAGE: &str = "Error streaming response.";

/// Request-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The server answered with a non-success status.
    #[error("server returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The connection could not be established.
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The request did not complete in time.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The request could not be built (bad URL, unserializable body).
    #[error("invalid request: {message}")]
    Invalid { message: String },

    /// Any other transport failure.
    #[error("request failed: {message}")]
    Other { message: String },
}

impl RequestError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::HttpStatus { .. } => "E_REQ_STATUS",
            RequestError::ConnectionFailed { .. } => "E_REQ_CONN",
            RequestError::Timeout { .. } => "E_REQ_TIMEOUT",
            RequestError::Invalid { .. } => "E_REQ_INVALID",
            RequestError::Other { .. } => "E_REQ_OTHER",
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message appended to the conversation when the exchange fails.
    pub fn user_message(&self) -> &'static str {
        EXCHANGE_FAILED_MESSAGE
    }
}

impl From<HttpError> for RequestError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => RequestError::HttpStatus { status, message },
            HttpError::ConnectionFailed(message) => RequestError::ConnectionFailed { message },
            HttpError::Timeout(message) => RequestError::Timeout { message },
            HttpError::InvalidUrl(message) => RequestError::Invalid { message },
            other => RequestError::Other {
                message: other.to_string(),
            },
        }
    }
}
