//! Mock implementations for testing.
//!
//! These test doubles let the exchange driver run without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client replaying scripted response bodies
//! - [`RecordingRenderSink`] - render sink that records every callback

pub mod http;
pub mod render;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use render::{RecordingRenderSink, RenderCall};
