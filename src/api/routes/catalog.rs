//! Catalog endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::catalog::Catalog;

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Result<Json<Catalog>, ApiError> {
    let catalog = state.catalog.catalog().await?;
    debug!(agent_types = catalog.agent_types.len(), "Serving catalog");
    Ok(Json(catalog))
}
