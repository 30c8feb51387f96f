use thiserror::Error;

/// Errors returned by document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store is not reachable (not initialized, disconnected, or switched off).
    #[error("document store unavailable: {reason}")]
    Unavailable { reason: String },

    /// A record addressed by id does not exist.
    #[error("{collection} record not found: {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// Snapshot file could not be read or written.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot contents could not be (de)serialized.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns `true` for connectivity failures (as opposed to bad input).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
