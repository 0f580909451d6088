//! AgentLab
//!
//! Configure, launch and review evaluation experiments of RAG agents:
//! - Path-addressed edits of experiment configs with a live checklist
//! - Saved configs with agent roster management
//! - Run submission and log following against an evaluation backend
//! - Browsing of past results and datasets

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::StorageBackend;
use domain::{
    CatalogProvider, DatasetSource, ResultsSource, RunBackend, SavedConfig, Storage, Validator,
};
use infrastructure::{
    backend::{HttpCatalogProvider, HttpClient, HttpRunBackend},
    catalog::{CachedCatalogProvider, StaticCatalogProvider},
    filesystem::{FsDatasetSource, FsResultsSource},
    saved_config::StorageSavedConfigRepository,
    services::{RunService, SavedConfigService},
    storage::{InMemoryStorage, JsonFileStorage},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let validator = Validator::new(config.editor.agent_id_policy);
    info!(policy = %validator.policy(), "Agent id policy");

    let storage: Arc<dyn Storage<SavedConfig>> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage for saved configs");
            Arc::new(InMemoryStorage::<SavedConfig>::new())
        }
        StorageBackend::File => {
            info!(path = %config.storage.path.display(), "Using JSON file storage for saved configs");
            Arc::new(JsonFileStorage::<SavedConfig>::open(&config.storage.path).await?)
        }
    };
    let repository = Arc::new(StorageSavedConfigRepository::new(storage));

    let (catalog, runs): (Arc<dyn CatalogProvider>, Option<Arc<RunService>>) =
        match config.backend.base_url.as_deref() {
            Some(base_url) => {
                info!(base_url, "Evaluation backend configured");
                let client = HttpClient::new(Duration::from_secs(config.backend.timeout_secs))?;

                let catalog = CachedCatalogProvider::new(
                    HttpCatalogProvider::new(client.clone(), base_url),
                    Duration::from_secs(config.backend.catalog_ttl_secs),
                );
                let backend: Arc<dyn RunBackend> = Arc::new(HttpRunBackend::new(client, base_url));

                (
                    Arc::new(catalog),
                    Some(Arc::new(RunService::new(backend, validator))),
                )
            }
            None => {
                info!("No evaluation backend configured, runs are disabled");
                (Arc::new(StaticCatalogProvider::default()), None)
            }
        };

    let results: Arc<dyn ResultsSource> =
        Arc::new(FsResultsSource::new(config.data.results_dir.clone()));
    let datasets: Arc<dyn DatasetSource> =
        Arc::new(FsDatasetSource::new(config.data.datasets_dir.clone()));

    let saved_configs = Arc::new(SavedConfigService::new(
        repository,
        catalog.clone(),
        validator,
    ));

    Ok(AppState {
        saved_configs,
        runs,
        catalog,
        results,
        datasets,
        validator,
    })
}
