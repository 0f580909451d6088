//! Dataset endpoints

use axum::extract::{Path, State};
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::dataset::DatasetFile;

/// GET /api/datasets
pub async fn list_datasets(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.datasets.list().await?))
}

/// GET /api/datasets/{id}/corpus
pub async fn get_corpus(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.datasets.load(&id, DatasetFile::Corpus).await?))
}

/// GET /api/datasets/{id}/test_set
pub async fn get_test_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.datasets.load(&id, DatasetFile::TestSet).await?))
}
