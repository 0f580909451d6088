//! Infrastructure services

mod run_service;
mod saved_config_service;

pub use run_service::RunService;
pub use saved_config_service::{SavedConfigEdit, SavedConfigService};
