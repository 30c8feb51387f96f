//! Chunk retrieval.
//!
//! Full-scan ranking of stored chunks against a query embedding. There is no
//! approximate-nearest-neighbor index: every candidate chunk is scored with
//! [`cosine_similarity`] and the top `k` are kept.


use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::constants::{SOURCE_PREVIEW_CHARS, STORE_IN_FILTER_LIMIT};
use crate::scoring::cosine_similarity;
use crate::store::{ChunkRecord, DocumentRecord, DocumentStore, SourceDescriptor};

/// Name shown for sources whose document metadata is missing.
pub const DEFAULT_DOCUMENT_NAME: &str = "Document";

/// A chunk paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub chunk: ChunkRecord,
    pub similarity: f32,
}

/// Scores stored chunks against a query embedding.
#[derive(Debug, Clone)]
pub struct ChunkRetriever<S> {
    store: S,
}

impl<S: DocumentStore> ChunkRetriever<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns up to `k` chunks by descending similarity.
    ///
    /// `document_ids` scopes the candidates; `None` or an empty list means every chunk.
    /// Chunks without an embedding are skipped. Equal scores keep store order. Store
    /// failures yield an empty result.
    #[instrument(skip(self, query_embedding, document_ids), fields(scoped = document_ids.is_some_and(|ids| !ids.is_empty())))]
    pub async fn retrieve(
        &self,
        query_embedding: &[f32],
        document_ids: Option<&[String]>,
        k: usize,
    ) -> Vec<ScoredChunk> {
        let scope = document_ids.filter(|ids| !ids.is_empty());
        let push_down = scope.filter(|ids| ids.len() <= STORE_IN_FILTER_LIMIT);

        let candidates = match self.store.chunks(push_down).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!(error = %e, "Chunk fetch failed, returning no chunks");
                return Vec::new();
            }
        };

        let post_filter = if push_down.is_none() { scope } else { None };

        let mut scored: Vec<ScoredChunk> = candidates
            .into_iter()
            .filter(|c| post_filter.is_none_or(|ids| ids.contains(&c.document_id)))
            .filter_map(|chunk| {
                let similarity = cosine_similarity(query_embedding, chunk.usable_embedding()?);
                Some(ScoredChunk { chunk, similarity })
            })
            .collect();

        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(k);

        debug!(returned = scored.len(), "Chunks ranked");
        scored
    }

    /// Builds client-facing source descriptors, joining each chunk with its document metadata.
    pub async fn prepare_sources(&self, chunks: &[ScoredChunk]) -> Vec<SourceDescriptor> {
        let mut documents: HashMap<&str, Option<DocumentRecord>> = HashMap::new();
        let mut sources = Vec::with_capacity(chunks.len());

        for scored in chunks {
            let document_id = scored.chunk.document_id.as_str();
            if !documents.contains_key(document_id) {
                let document = match self.store.get_document(document_id).await {
                    Ok(doc) => doc,
                    Err(e) => {
                        warn!(document_id, error = %e, "Document metadata lookup failed");
                        None
                    }
                };
                documents.insert(document_id, document);
            }
            let document = documents.get(document_id).and_then(Option::as_ref);

            sources.push(SourceDescriptor {
                page: scored.chunk.metadata.page_number,
                kind: scored.chunk.kind,
                document_id: document_id.to_string(),
                document_name: document
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string()),
                file_url: document.and_then(|d| d.file_url.clone()),
                content: preview(&scored.chunk.content),
                similarity: Some(scored.similarity),
            });
        }

        sources
    }
}

/// Truncates to the preview length, appending `...` when anything was cut.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(SOURCE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
