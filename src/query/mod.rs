//! Request-level question answering.
//!
//! [`QueryEngine::answer`] runs: detect intent, embed the question, consult the question
//! cache, and on a miss retrieve chunks, generate an answer, score its confidence, look for
//! a deadline and write the result back to the cache. Every answered question is also
//! logged to the asking user's history.
//!
//! Only embedding and generation failures are errors. Store trouble degrades to a cache
//! miss, an empty retrieval or a skipped write.

mod error;
mod types;


pub use error::{QueryError, QueryResult};
pub use types::{ANONYMOUS_USER, HealthReport, QueryRequest, QueryResponse};

use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheLookup, CacheStatus, CachedAnswer, NewCachedAnswer, QuestionCache};
use crate::constants::{DEFAULT_TOP_K, HEALTH_CHUNK_COUNT_LIMIT, MODEL_LABEL, NO_CONTEXT_ANSWER};
use crate::deadline::extract_deadline;
use crate::embedding::EmbeddingProvider;
use crate::generation::{GenerativeModel, build_multimodal_prompt};
use crate::history::HistoryRepository;
use crate::intent::detect_intent;
use crate::retrieval::ChunkRetriever;
use crate::scoring::calculate_confidence;
use crate::store::{ChunkKind, DocumentStore};

/// Question-answering pipeline over injected store, embedder and model.
#[derive(Debug, Clone)]
pub struct QueryEngine<S, E, M> {
    store: S,
    cache: QuestionCache<S>,
    retriever: ChunkRetriever<S>,
    history: HistoryRepository<S>,
    embedder: E,
    model: M,
    top_k: usize,
}

impl<S, E, M> QueryEngine<S, E, M>
where
    S: DocumentStore + Clone,
    E: EmbeddingProvider,
    M: GenerativeModel,
{
    pub fn new(store: S, embedder: E, model: M) -> Self {
        Self {
            cache: QuestionCache::new(store.clone()),
            retriever: ChunkRetriever::new(store.clone()),
            history: HistoryRepository::new(store.clone()),
            store,
            embedder,
            model,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.cache = self.cache.with_threshold(threshold);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn cache(&self) -> &QuestionCache<S> {
        &self.cache
    }

    pub fn history(&self) -> &HistoryRepository<S> {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Answers a question, reusing a cached answer when one applies.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, question_len = request.question.len()))]
    pub async fn answer(&self, request: &QueryRequest) -> QueryResult<QueryResponse> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        let intent = detect_intent(question);
        debug!(%intent, "Intent detected");

        let embedding = self.embedder.embed_text(question).await?;

        match self
            .cache
            .find_similar_question(question, &embedding, intent)
            .await
        {
            CacheLookup::Hit(hit) => return Ok(self.reuse(hit, &request.user_id, question).await),
            CacheLookup::Miss => debug!("Cache miss"),
            CacheLookup::StoreUnavailable(reason) => {
                warn!(%reason, "Cache unavailable, answering without it")
            }
        }

        let chunks = self
            .retriever
            .retrieve(&embedding, request.document_ids.as_deref(), self.top_k)
            .await;

        if chunks.is_empty() {
            info!("No relevant chunks found");
            return Ok(QueryResponse {
                answer: NO_CONTEXT_ANSWER.to_string(),
                sources: Vec::new(),
                has_visual_content: false,
                cached: false,
                similarity: None,
                deadline: None,
                confidence: None,
                status: CacheStatus::Miss,
            });
        }

        let prompt = build_multimodal_prompt(question, &chunks);
        let answer = self.model.generate(prompt).await?;

        let sources = self.retriever.prepare_sources(&chunks).await;
        let has_visual_content = chunks.iter().any(|c| c.chunk.kind == ChunkKind::Image);
        let confidence = calculate_confidence(&sources);
        let deadline = extract_deadline(&answer, &sources);

        let question_id = self
            .cache
            .store_question(NewCachedAnswer {
                question: question.to_string(),
                embedding,
                answer: answer.clone(),
                intent,
                confidence: Some(confidence.clone()),
                sources: sources.clone(),
                deadline: deadline.clone(),
            })
            .await;

        if let Some(id) = &question_id {
            self.history
                .store_user_question(&request.user_id, id, question)
                .await;
        }

        info!(sources = sources.len(), score = confidence.score, "Answer generated");
        Ok(QueryResponse {
            answer,
            sources,
            has_visual_content,
            cached: false,
            similarity: None,
            deadline,
            confidence: Some(confidence),
            status: CacheStatus::Miss,
        })
    }

    async fn reuse(&self, hit: CachedAnswer, user_id: &str, question: &str) -> QueryResponse {
        self.cache.increment_question_count(hit.id()).await;
        self.history
            .store_user_question(user_id, hit.id(), question)
            .await;

        let CachedAnswer {
            record,
            similarity,
            status,
        } = hit;
        let deadline = extract_deadline(&record.answer, &record.sources);

        QueryResponse {
            has_visual_content: record.has_visual_sources(),
            answer: record.answer,
            sources: record.sources,
            cached: true,
            similarity: Some(similarity),
            deadline,
            confidence: Some(record.confidence),
            status,
        }
    }

    /// Reports store connectivity and the number of stored chunks.
    pub async fn health(&self) -> HealthReport {
        let store_connected = self.store.is_available().await;
        let chunks_stored = if store_connected {
            self.store
                .count_chunks(HEALTH_CHUNK_COUNT_LIMIT)
                .await
                .unwrap_or_default()
        } else {
            0
        };

        HealthReport {
            status: if store_connected { "healthy" } else { "degraded" },
            chunks_stored,
            model: MODEL_LABEL,
            store_connected,
        }
    }
}
