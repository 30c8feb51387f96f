use tracing::debug;

use super::EmbeddingProvider;
use super::error::EmbeddingResult;
use crate::hashing::{hash_to_u64, normalize_question};
use crate::scoring::similarity::l2_normalize;

/// Deterministic embedder for running without a model service.
///
/// Text is embedded as a signed feature-hashed bag of normalized words, so texts sharing
/// most words land close together. Images are embedded from a seed derived from their bytes.
/// Output is always L2-normalized and never all-zero.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_words(&self, text: &str) -> Vec<f32> {
        let normalized = normalize_question(text);
        let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.is_empty() {
            tokens.push(text);
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for token in tokens {
            let h = hash_to_u64(token.as_bytes());
            let slot = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            embedding[slot] += sign;
        }

        l2_normalize(&mut embedding);
        embedding
    }

    fn embed_seeded(&self, seed: u64) -> Vec<f32> {
        let mut embedding = Vec::with_capacity(self.dimension);
        let mut state = seed;

        for _ in 0..self.dimension {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl EmbeddingProvider for StubEmbedder {
    async fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        debug!(text_len = text.len(), "Generating stub text embedding");
        Ok(self.embed_words(text))
    }

    async fn embed_image(&self, image_base64: &str) -> EmbeddingResult<Vec<f32>> {
        debug!(image_len = image_base64.len(), "Generating stub image embedding");
        Ok(self.embed_seeded(hash_to_u64(image_base64.as_bytes())))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
