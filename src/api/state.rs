//! Application state for shared services

use std::sync::Arc;

use crate::domain::catalog::CatalogProvider;
use crate::domain::dataset::DatasetSource;
use crate::domain::experiment::Validator;
use crate::domain::results::ResultsSource;
use crate::infrastructure::services::{RunService, SavedConfigService};

use super::types::ApiError;

#[derive(Clone, Debug)]
pub struct AppState {
    pub saved_configs: Arc<SavedConfigService>,
    /// Absent when no evaluation backend is configured
    pub runs: Option<Arc<RunService>>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub results: Arc<dyn ResultsSource>,
    pub datasets: Arc<dyn DatasetSource>,
    pub validator: Validator,
}

impl AppState {
    pub fn run_service(&self) -> Result<&Arc<RunService>, ApiError> {
        self.runs
            .as_ref()
            .ok_or_else(|| ApiError::unavailable("No evaluation backend is configured"))
    }
}
