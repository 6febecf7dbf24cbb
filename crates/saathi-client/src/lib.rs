//! Client for the scheme navigator backend.
//!
//! Wraps the chat, text-to-speech, health, and scheme catalogue endpoints
//! behind small traits so callers can substitute in-process fakes.

pub mod api;
pub mod error;
pub mod http;
pub mod types;

pub use api::{CatalogApi, ChatApi, TtsApi};
pub use error::ClientError;
pub use http::HttpClient;
pub use types::{ChatReply, ChatRequest, HealthStatus, SchemeCatalog, SchemeQuery, TtsRequest};
