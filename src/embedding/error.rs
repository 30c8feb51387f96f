use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding service unreachable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error(transparent)]
    Dimension(#[from] DimValidationError),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            EmbeddingError::ProviderUnavailable {
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            EmbeddingError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
