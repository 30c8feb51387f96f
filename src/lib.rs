//! Campus library crate (used by the server binary and integration tests).
//!
//! Answers student questions over ingested course documents and reuses earlier answers
//! through an entity-aware question cache.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`QueryEngine`], [`QueryRequest`], [`QueryResponse`] - Question answering
//! - [`QuestionCache`], [`CacheLookup`], [`CacheStatus`] - Exact and semantic answer reuse
//! - [`ChunkRetriever`], [`ScoredChunk`] - Top-k chunk retrieval
//! - [`Config`], [`ConfigError`] - Server configuration
//!
//! ## Question Analysis
//! - [`detect_intent`], [`Intent`] - Keyword intent classification
//! - [`extract_entities`], [`Entities`] - Year, program and semester extraction
//! - [`question_fingerprint`] - Exact-match cache keys
//!
//! ## Answer Enrichment
//! - [`calculate_confidence`], [`ConfidenceInfo`] - Source-based confidence
//! - [`extract_deadline`], [`DeadlineInfo`] - Calendar-ready deadline detection
//!
//! ## Backends
//! - [`DocumentStore`], [`InMemoryStore`] - Document database seam
//! - [`EmbeddingProvider`], [`EmbeddingBackend`] - Text and image embedding
//! - [`GenerativeModel`], [`GenaiModel`] - Multimodal answer generation
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod deadline;
pub mod embedding;
pub mod entities;
pub mod gateway;
pub mod generation;
pub mod hashing;
pub mod history;
pub mod intent;
pub mod query;
pub mod retrieval;
pub mod scoring;
pub mod store;

pub use cache::{
    CACHE_STATUS_HEADER, CacheLookup, CacheStatus, CachedAnswer, FaqItem, FaqPage, FaqSort,
    FaqStats, NewCachedAnswer, QuestionCache,
};
pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K, DimValidationError,
    NO_CONTEXT_ANSWER, validate_embedding_dim,
};
pub use deadline::{DeadlineInfo, extract_deadline, extract_deadline_info};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    EmbeddingBackend, EmbeddingError, EmbeddingProvider, EmbeddingResult, HttpEmbedder,
    StubEmbedder,
};
pub use entities::{AcademicYear, Entities, Program, entities_match, extract_entities};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
#[cfg(any(test, feature = "mock"))]
pub use generation::MockModel;
pub use generation::{
    GenaiModel, GenerationError, GenerativeModel, PromptPart, build_multimodal_prompt,
};
pub use hashing::{hash_question, hash_to_u64, normalize_question, question_fingerprint};
pub use history::{HistoryError, HistoryItem, HistoryRepository};
pub use intent::{Intent, detect_intent};
pub use query::{HealthReport, QueryEngine, QueryError, QueryRequest, QueryResponse};
pub use retrieval::{ChunkRetriever, ScoredChunk};
pub use scoring::{ConfidenceInfo, ConfidenceLevel, calculate_confidence, cosine_similarity};
pub use store::{
    ChunkKind, ChunkRecord, DocumentRecord, DocumentStore, InMemoryStore, QuestionRecord,
    SourceDescriptor, StoreError, StoreSnapshot, UserQuestionRecord,
};
