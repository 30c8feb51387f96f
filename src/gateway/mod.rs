//! HTTP gateway (Axum) over the question-answering engine.
//!
//! Routes:
//! - `POST /query` answers a question; the `X-Campus-Cache` header reports the cache outcome.
//! - `GET /faq`, `GET /faq/stats` list popular questions.
//! - `GET /history/{userId}` and the favorite/note mutators manage per-user history.
//! - `GET /health` reports store status; `GET /healthz` is a liveness probe.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    faq_handler, faq_stats_handler, history_handler, note_handler, query_handler,
    service_health_handler, toggle_favorite_handler,
};
pub use state::HandlerState;

use crate::embedding::EmbeddingProvider;
use crate::generation::GenerativeModel;
use crate::store::DocumentStore;

pub fn create_router_with_state<S, E, M>(state: HandlerState<S, E, M>) -> Router
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/health", get(service_health_handler::<S, E, M>))
        .route("/query", post(query_handler::<S, E, M>))
        .route("/faq", get(faq_handler::<S, E, M>))
        .route("/faq/stats", get(faq_stats_handler::<S, E, M>))
        .route("/history/{id}", get(history_handler::<S, E, M>))
        .route(
            "/history/user/{user_id}/question/{history_id}/favorite",
            put(toggle_favorite_handler::<S, E, M>),
        )
        .route("/history/{id}/note", put(note_handler::<S, E, M>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
