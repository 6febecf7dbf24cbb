//! Endpoint traits.
//!
//! The chat workflow, speech synthesis, and catalogue browsing each depend on
//! the narrowest trait they need, so they can be driven by in-process fakes.

use async_trait::async_trait;

use saathi_core::SchemeMatch;

use crate::error::ClientError;
use crate::types::{ChatReply, ChatRequest, HealthStatus, SchemeCatalog, SchemeQuery};

/// `POST /chat`.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError>;
}

/// `POST /tts`.
#[async_trait]
pub trait TtsApi: Send + Sync {
    /// Raw audio bytes (mpeg or wav, as the backend chooses).
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ClientError>;
}

/// Health check and scheme catalogue.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ClientError>;

    async fn list_schemes(&self, query: &SchemeQuery) -> Result<SchemeCatalog, ClientError>;

    async fn get_scheme(&self, id: &str, language: &str) -> Result<SchemeMatch, ClientError>;

    /// Boolean form of [`CatalogApi::health`].
    async fn ping(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                false
            }
        }
    }
}
