use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history entry not found: {id}")]
    NotFound { id: String },

    #[error("history entry {id} belongs to another user")]
    Forbidden { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
