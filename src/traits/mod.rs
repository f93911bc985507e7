//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - streaming POST transport
//! - [`RenderSink`] - receiver for turn updates and follow-up prompts

pub mod http;
pub mod render;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
pub use render::RenderSink;
