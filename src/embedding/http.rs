use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::EmbeddingProvider;
use super::error::{EmbeddingError, EmbeddingResult};
use crate::constants::validate_embedding_dim;
use crate::scoring::similarity::l2_normalize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an embedding service exposing `POST /embed/text` and `POST /embed/image`.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    dimension: usize,
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(base_url: &str, dimension: usize) -> EmbeddingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dimension,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> EmbeddingResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%url, %status, "Embedding service returned an error");
            return Err(EmbeddingError::RequestFailed {
                reason: format!("{status}: {body}"),
            });
        }

        let EmbedResponse { mut embedding } = response.json().await?;
        validate_embedding_dim(embedding.len(), self.dimension)?;
        l2_normalize(&mut embedding);

        debug!(%url, dim = embedding.len(), "Embedding received");
        Ok(embedding)
    }
}

impl EmbeddingProvider for HttpEmbedder {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.post("/embed/text", &TextRequest { text }).await
    }

    #[instrument(skip(self, image_base64), fields(image_len = image_base64.len()))]
    async fn embed_image(&self, image_base64: &str) -> EmbeddingResult<Vec<f32>> {
        self.post("/embed/image", &ImageRequest { image: image_base64 })
            .await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
