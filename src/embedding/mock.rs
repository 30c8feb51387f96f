use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::error::{EmbeddingError, EmbeddingResult};
use super::stub::StubEmbedder;
use super::EmbeddingProvider;

/// Embedder returning fixed vectors for registered texts.
///
/// Unregistered input falls back to [`StubEmbedder`]. Clones share state.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    inner: Arc<MockInner>,
}

#[derive(Debug)]
struct MockInner {
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    fallback: StubEmbedder,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: Arc::new(MockInner {
                vectors: RwLock::new(HashMap::new()),
                fallback: StubEmbedder::new(dimension),
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }),
        }
    }

    /// Registers `vector` as the embedding of `text` (exact match).
    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.set_vector(text, vector);
        self
    }

    pub fn set_vector(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.inner.vectors.write().insert(text.into(), vector);
    }

    pub fn set_failing(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> EmbeddingResult<()> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ProviderUnavailable {
                reason: "mock embedder failure".to_string(),
            });
        }
        Ok(())
    }
}

impl EmbeddingProvider for MockEmbedder {
    async fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.check_failure()?;
        let registered = self.inner.vectors.read().get(text).cloned();
        match registered {
            Some(v) => Ok(v),
            None => self.inner.fallback.embed_text(text).await,
        }
    }

    async fn embed_image(&self, image_base64: &str) -> EmbeddingResult<Vec<f32>> {
        self.check_failure()?;
        let registered = self.inner.vectors.read().get(image_base64).cloned();
        match registered {
            Some(v) => Ok(v),
            None => self.inner.fallback.embed_image(image_base64).await,
        }
    }

    fn dimension(&self) -> usize {
        self.inner.fallback.dimension()
    }
}
