//! Domain layer - Core business logic and entities

pub mod catalog;
pub mod dataset;
pub mod document;
pub mod error;
pub mod experiment;
pub mod results;
pub mod run;
pub mod saved_config;
pub mod storage;

pub use catalog::{Catalog, CatalogOption, CatalogProvider, MetricGroups, MetricOption};
pub use dataset::{DatasetFile, DatasetSource};
pub use document::{get_at_path, set_at_path, FieldPath, PathError, PathSegment};
pub use error::DomainError;
pub use experiment::{
    Agent, AgentIdPolicy, AgentRoster, ConfigDraft, DraftError, ExperimentConfig, RosterError,
    ValidationReport, Validator,
};
pub use results::{QueryRow, Report, ResultGroup, ResultSummary, ResultsSource};
pub use run::{
    JobId, JobStatus, JobStatusReport, LogEvent, LogStream, RunBackend, RunHandle, RunOutcome,
    RunRequest,
};
pub use saved_config::{SavedConfig, SavedConfigId, SavedConfigRepository};
pub use storage::{Storage, StorageEntity, StorageKey};
