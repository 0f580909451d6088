//! Saved config endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ChangeAgentTypeRequest, ConfigBody, Json, SavedConfigResponse, SetFieldRequest,
};
use crate::domain::experiment::ValidationReport;
use crate::domain::run::{RunHandle, RunRequest};
use crate::domain::saved_config::SavedConfig;

/// GET /api/configs
pub async fn list_configs(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedConfig>>, ApiError> {
    Ok(Json(state.saved_configs.list().await?))
}

/// POST /api/configs
pub async fn create_config(
    State(state): State<AppState>,
    Json(body): Json<ConfigBody>,
) -> Result<(StatusCode, Json<SavedConfig>), ApiError> {
    let saved = state.saved_configs.create(body.config).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/configs/{id}
pub async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedConfig>, ApiError> {
    Ok(Json(state.saved_configs.get(&id).await?))
}

/// PUT /api/configs/{id}
pub async fn replace_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ConfigBody>,
) -> Result<Json<SavedConfigResponse>, ApiError> {
    let edit = state.saved_configs.replace(&id, body.config).await?;
    Ok(Json(edit.into()))
}

/// DELETE /api/configs/{id}
pub async fn delete_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.saved_configs.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/configs/{id}/fields
pub async fn set_config_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<SavedConfigResponse>, ApiError> {
    let path = request.path.parse()?;
    debug!(id = %id, path = %path, "Setting config field");

    let edit = state
        .saved_configs
        .set_field(&id, &path, request.value)
        .await?;
    Ok(Json(edit.into()))
}

/// GET /api/configs/{id}/validation
pub async fn config_validation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ValidationReport>, ApiError> {
    Ok(Json(state.saved_configs.validation(&id).await?))
}

/// POST /api/configs/{id}/duplicate
pub async fn duplicate_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SavedConfig>), ApiError> {
    let copy = state.saved_configs.duplicate(&id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// POST /api/configs/{id}/agents
///
/// With every agent type in use under the by-type policy the config is
/// returned unchanged and `agent_index` is omitted.
pub async fn add_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedConfigResponse>, ApiError> {
    Ok(Json(state.saved_configs.add_agent(&id).await?.into()))
}

/// POST /api/configs/{id}/agents/{index}/duplicate
pub async fn duplicate_agent(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<SavedConfigResponse>, ApiError> {
    Ok(Json(state.saved_configs.duplicate_agent(&id, index).await?.into()))
}

/// PUT /api/configs/{id}/agents/{index}/type
pub async fn change_agent_type(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Json(request): Json<ChangeAgentTypeRequest>,
) -> Result<Json<SavedConfigResponse>, ApiError> {
    let edit = state
        .saved_configs
        .change_agent_type(&id, index, &request.agent_type)
        .await?;
    Ok(Json(edit.into()))
}

/// DELETE /api/configs/{id}/agents/{index}
pub async fn remove_agent(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<SavedConfigResponse>, ApiError> {
    Ok(Json(state.saved_configs.remove_agent(&id, index).await?.into()))
}

/// POST /api/configs/{id}/run
pub async fn run_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RunHandle>), ApiError> {
    let runs = state.run_service()?;
    let saved = state.saved_configs.get(&id).await?;

    let request = RunRequest::new(saved.config().clone())
        .with_id(saved.id().as_str())
        .with_name(saved.name());
    let handle = runs.submit(request).await?;

    Ok((StatusCode::ACCEPTED, Json(handle)))
}
