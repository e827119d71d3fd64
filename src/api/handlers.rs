use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{SearchState, TrendingEntry},
};

use super::AppState;

/// Longest query accepted from the search box, in characters
const MAX_QUERY_CHARS: usize = 200;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub search: SearchState,
    pub trending: Vec<TrendingEntry>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Everything the page renders: search box, results and trending list
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse {
        search: state.search.snapshot(),
        trending: state.trending.entries().to_vec(),
    })
}

/// Forward a keystroke from the search box
pub async fn set_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> AppResult<(StatusCode, Json<SearchState>)> {
    if request.query.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Search query cannot exceed {} characters",
            MAX_QUERY_CHARS
        )));
    }

    tracing::debug!(request_id = %request_id, query = %request.query, "Query updated");
    state.search.set_query(request.query);

    Ok((StatusCode::ACCEPTED, Json(state.search.snapshot())))
}

/// Trending searches loaded at startup
pub async fn get_trending(State(state): State<AppState>) -> Json<Vec<TrendingEntry>> {
    Json(state.trending.entries().to_vec())
}
