use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::history::HistoryError;
use crate::query::QueryError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryError> for GatewayError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::EmptyQuestion => GatewayError::InvalidRequest(err.to_string()),
            QueryError::Embedding(EmbeddingError::Dimension(_)) => {
                GatewayError::InternalError(err.to_string())
            }
            QueryError::Embedding(_) | QueryError::Generation(_) => {
                GatewayError::ProviderError(err.to_string())
            }
        }
    }
}

impl From<HistoryError> for GatewayError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NotFound { .. } => GatewayError::NotFound(err.to_string()),
            HistoryError::Forbidden { .. } => GatewayError::Forbidden(err.to_string()),
            HistoryError::Store(_) => GatewayError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
