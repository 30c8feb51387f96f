use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;

/// Hard failures of a query. Cache and retrieval problems never surface here.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("failed to embed question: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("failed to generate answer: {0}")]
    Generation(#[from] GenerationError),
}

pub type QueryResult<T> = Result<T, QueryError>;
