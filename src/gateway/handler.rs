use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cache::{CACHE_STATUS_HEADER, FaqItem, FaqSort};
use crate::constants::{DEFAULT_FAQ_LIMIT, DEFAULT_HISTORY_LIMIT, MAX_FAQ_LIMIT};
use crate::embedding::EmbeddingProvider;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::generation::GenerativeModel;
use crate::history::HistoryItem;
use crate::intent::Intent;
use crate::query::QueryRequest;
use crate::store::DocumentStore;

#[instrument(skip(state, payload))]
pub async fn query_handler<S, E, M>(
    State(state): State<HandlerState<S, E, M>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    let Json(request) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    let response = state.engine.answer(&request).await?;
    debug!(status = %response.status, cached = response.cached, "Query answered");

    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_STATUS_HEADER,
        HeaderValue::from_static(response.status.as_header_value()),
    );

    Ok((StatusCode::OK, headers, Json(response)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqParams {
    pub limit: Option<usize>,
    pub intent: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FaqFilters {
    pub intent: Option<Intent>,
    pub sort_by: FaqSort,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub faqs: Vec<FaqItem>,
    pub total: usize,
    pub returned: usize,
    pub filters: FaqFilters,
}

/// Parses the `intent` filter. Absent, blank and `"all"` mean no filter.
pub(crate) fn parse_intent_filter(raw: Option<&str>) -> Result<Option<Intent>, GatewayError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse::<Intent>()
            .map(Some)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string())),
    }
}

pub(crate) fn parse_faq_limit(raw: Option<usize>) -> Result<usize, GatewayError> {
    let limit = raw.unwrap_or(DEFAULT_FAQ_LIMIT);
    if !(1..=MAX_FAQ_LIMIT).contains(&limit) {
        return Err(GatewayError::InvalidRequest(format!(
            "limit must be between 1 and {MAX_FAQ_LIMIT}, got {limit}"
        )));
    }
    Ok(limit)
}

#[instrument(skip(state, params))]
pub async fn faq_handler<S, E, M>(
    State(state): State<HandlerState<S, E, M>>,
    params: Result<Query<FaqParams>, QueryRejection>,
) -> Result<Json<FaqResponse>, GatewayError>
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    let Query(params) = params.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let limit = parse_faq_limit(params.limit)?;
    let intent = parse_intent_filter(params.intent.as_deref())?;
    let sort_by = params
        .sort_by
        .as_deref()
        .and_then(|s| s.parse::<FaqSort>().ok())
        .unwrap_or_default();

    let page = state.engine.cache().faq(limit, intent, sort_by).await;

    Ok(Json(FaqResponse {
        returned: page.faqs.len(),
        total: page.total,
        faqs: page.faqs,
        filters: FaqFilters {
            intent,
            sort_by,
            limit,
        },
    }))
}

#[instrument(skip(state))]
pub async fn faq_stats_handler<S, E, M>(State(state): State<HandlerState<S, E, M>>) -> Response
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    Json(state.engine.cache().faq_stats().await).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
    #[serde(default)]
    pub favorites_only: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryItem>,
    pub count: usize,
}

#[instrument(skip(state, params))]
pub async fn history_handler<S, E, M>(
    State(state): State<HandlerState<S, E, M>>,
    Path(user_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, GatewayError>
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    let Query(params) = params.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit == 0 {
        return Err(GatewayError::InvalidRequest(
            "limit must be at least 1".to_string(),
        ));
    }

    let history = state
        .engine
        .history()
        .user_history(&user_id, limit, params.favorites_only)
        .await;

    Ok(Json(HistoryResponse {
        success: true,
        count: history.len(),
        history,
    }))
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub success: bool,
    pub favorite: bool,
}

#[instrument(skip(state))]
pub async fn toggle_favorite_handler<S, E, M>(
    State(state): State<HandlerState<S, E, M>>,
    Path((user_id, history_id)): Path<(String, String)>,
) -> Result<Json<FavoriteResponse>, GatewayError>
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    let favorite = state
        .engine
        .history()
        .toggle_favorite(&user_id, &history_id)
        .await?;

    Ok(Json(FavoriteResponse {
        success: true,
        favorite,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub user_id: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub success: bool,
}

#[instrument(skip(state, payload))]
pub async fn note_handler<S, E, M>(
    State(state): State<HandlerState<S, E, M>>,
    Path(history_id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<NoteResponse>, GatewayError>
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    let Json(request) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    state
        .engine
        .history()
        .set_note(&request.user_id, &history_id, &request.note)
        .await?;

    Ok(Json(NoteResponse { success: true }))
}

#[instrument(skip(state))]
pub async fn service_health_handler<S, E, M>(
    State(state): State<HandlerState<S, E, M>>,
) -> Response
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    Json(state.engine.health().await).into_response()
}
