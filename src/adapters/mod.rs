//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`HtmlRenderSink`] - render sink producing sanitized HTML
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - scripted streaming responses
//! - [`mock::RecordingRenderSink`] - records render callbacks

pub mod html_render;
pub mod mock;
pub mod reqwest_http;

pub use html_render::HtmlRenderSink;
pub use mock::{MockHttpClient, RecordingRenderSink};
pub use reqwest_http::ReqwestHttpClient;
