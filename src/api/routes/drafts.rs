//! Stateless editor endpoints: the client holds the config

use axum::extract::{Query, State};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, DraftResponse, EmptyDraftQuery, Json, SetDraftFieldRequest, ValidateDraftRequest,
};
use crate::domain::experiment::{ConfigDraft, ExperimentConfig, ValidationReport};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_validation;

/// GET /api/drafts/empty
pub async fn empty_draft(Query(query): Query<EmptyDraftQuery>) -> Json<ExperimentConfig> {
    if query.seeded {
        Json(ExperimentConfig::seeded())
    } else {
        Json(ExperimentConfig::empty())
    }
}

/// POST /api/drafts/validate
pub async fn validate_draft(
    State(state): State<AppState>,
    Json(request): Json<ValidateDraftRequest>,
) -> Json<ValidationReport> {
    let report = state.validator.report(&request.config);
    record_validation(report.is_valid);
    Json(report)
}

/// POST /api/drafts/set
pub async fn set_draft_field(
    State(state): State<AppState>,
    Json(request): Json<SetDraftFieldRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    let path = request.path.parse()?;

    let mut draft = ConfigDraft::new(request.config, state.validator);
    draft
        .update(&path, request.value)
        .map_err(DomainError::from)?;

    let errors = draft.errors().to_vec();
    record_validation(errors.is_empty());

    Ok(Json(DraftResponse {
        is_valid: errors.is_empty(),
        errors,
        config: draft.into_config(),
    }))
}
