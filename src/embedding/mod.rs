//! Embedding providers.
//!
//! Questions, text chunks and image chunks are embedded into one vector space so that a
//! single cosine threshold works across all of them. Providers return L2-normalized vectors
//! of a fixed dimension.
//!
//! - [`http`] calls an external embedding service (CLIP by default).
//! - [`stub`] is a deterministic local embedder for running without a model service.
//! - `mock` (tests / `mock` feature) maps known texts to fixed vectors.

mod error;
/// HTTP embedding service client.
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Deterministic feature-hashing embedder.
pub mod stub;

pub use error::{EmbeddingError, EmbeddingResult};
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use stub::StubEmbedder;

use std::future::Future;

/// Text and image embedding.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a piece of text.
    fn embed_text(&self, text: &str) -> impl Future<Output = EmbeddingResult<Vec<f32>>> + Send;

    /// Embeds a base64-encoded image.
    fn embed_image(
        &self,
        image_base64: &str,
    ) -> impl Future<Output = EmbeddingResult<Vec<f32>>> + Send;

    /// Output dimension.
    fn dimension(&self) -> usize;
}

/// Embedder selected at startup.
#[derive(Debug, Clone)]
pub enum EmbeddingBackend {
    Http(HttpEmbedder),
    Stub(StubEmbedder),
}

impl EmbeddingBackend {
    /// Uses the HTTP service when a URL is configured, the stub otherwise.
    pub fn from_url(url: Option<&str>, dimension: usize) -> EmbeddingResult<Self> {
        match url {
            Some(url) => Ok(EmbeddingBackend::Http(HttpEmbedder::new(url, dimension)?)),
            None => Ok(EmbeddingBackend::Stub(StubEmbedder::new(dimension))),
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, EmbeddingBackend::Stub(_))
    }
}

impl EmbeddingProvider for EmbeddingBackend {
    async fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        match self {
            EmbeddingBackend::Http(e) => e.embed_text(text).await,
            EmbeddingBackend::Stub(e) => e.embed_text(text).await,
        }
    }

    async fn embed_image(&self, image_base64: &str) -> EmbeddingResult<Vec<f32>> {
        match self {
            EmbeddingBackend::Http(e) => e.embed_image(image_base64).await,
            EmbeddingBackend::Stub(e) => e.embed_image(image_base64).await,
        }
    }

    fn dimension(&self) -> usize {
        match self {
            EmbeddingBackend::Http(e) => e.dimension(),
            EmbeddingBackend::Stub(e) => e.dimension(),
        }
    }
}
