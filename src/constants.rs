//! Cross-cutting, shared constants.
//!
//! The embedding dimension is a corpus-wide invariant: question embeddings and chunk
//! embeddings come from the same provider and must agree in length for cosine scoring.

/// CLIP ViT-B/32 projection size.
pub const DEFAULT_EMBEDDING_DIM: usize = 512;

/// Semantic cache threshold. A candidate must score strictly above this.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.90;

/// Chunks returned by retrieval when the caller does not ask for a specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum characters of chunk content shown in a source preview.
pub const SOURCE_PREVIEW_CHARS: usize = 150;

/// Largest document-id list pushed down to the store as an "in" filter.
///
/// Longer lists are applied after the fetch instead.
pub const STORE_IN_FILTER_LIMIT: usize = 10;

/// Records scanned when building the FAQ listing.
pub const FAQ_SCAN_LIMIT: usize = 100;

/// Records scanned when computing FAQ statistics.
pub const FAQ_STATS_SCAN_LIMIT: usize = 1000;

/// Upper bound for chunk counting in health reports.
pub const HEALTH_CHUNK_COUNT_LIMIT: usize = 1000;

/// Default and maximum page sizes for FAQ listings.
pub const DEFAULT_FAQ_LIMIT: usize = 10;
pub const MAX_FAQ_LIMIT: usize = 100;

/// Default page size for user history.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Default generative model and sampling temperature.
pub const DEFAULT_GENAI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GENAI_TEMPERATURE: f64 = 0.2;

/// Answer returned when retrieval finds nothing to ground a response on.
pub const NO_CONTEXT_ANSWER: &str = "I couldn't find any relevant information in the documents.";

/// Model label reported by health checks.
pub const MODEL_LABEL: &str = "CLIP + Gemini Vision";

/// Validates that an embedding has the expected number of dimensions.
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::Mismatch { expected, actual });
    }
    Ok(())
}

/// Errors from [`validate_embedding_dim`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: usize, actual: usize },
}
