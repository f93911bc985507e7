//! HTTP client trait abstraction.
//!
//! The chat core only ever needs one HTTP operation: POST a JSON body and read
//! the response incrementally. Hiding it behind a trait lets the exchange
//! driver run against reqwest in production and a scripted mock in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A response body delivered as a sequence of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,
    /// IO error while reading the body
    #[error("IO error: {0}")]
    Io(String),
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Other error
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Trait for the streaming HTTP transport.
///
/// # Example
///
/// ```ignore
/// use docchat::traits::{HttpClient, Headers};
/// use futures::StreamExt;
///
/// async fn dump<C: HttpClient>(client: &C) -> Result<(), docchat::traits::HttpError> {
///     let mut body = client.post_stream("https://example.com/chat", "{}", &Headers::new()).await?;
///     while let Some(chunk) = body.next().await {
///         println!("{} bytes", chunk?.len());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the response body as a byte stream.
    ///
    /// Implementations must return `Err(HttpError::ServerError { .. })` for a
    /// non-success status instead of handing back the error body as a stream.
    async fn post_stream(&self, url: &str, body: &str, headers: &Headers)
        -> Result<ByteStream, HttpError>;
}
