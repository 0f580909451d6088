//! Results endpoints

use axum::extract::{Path, State};
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::results::{QueryRow, ResultGroup, ResultSummary};

/// GET /api/results
pub async fn list_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResultSummary>>, ApiError> {
    Ok(Json(state.results.list().await?))
}

/// GET /api/results/grouped
pub async fn grouped_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResultGroup>>, ApiError> {
    Ok(Json(state.results.grouped().await?))
}

/// GET /api/results/{id}
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .results
        .get_raw(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Result not found"))
}

/// GET /api/results/{id}/queries
pub async fn result_queries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<QueryRow>>, ApiError> {
    let report = state
        .results
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Result not found"))?;

    Ok(Json(report.per_query_rows()))
}
