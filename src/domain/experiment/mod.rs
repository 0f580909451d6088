//! Experiment domain module
//!
//! The configuration document for one RAG evaluation experiment, the
//! submission checklist, and the rules for managing its agents.

mod defaults;
mod draft;
mod entity;
mod roster;
mod validation;

pub use defaults::slot_id;
pub use draft::{apply_edit, ConfigDraft, DraftError};
pub use entity::{
    Agent, AgentOverrides, Chunking, ChunkingParameters, DataIngestion, DataSource, Embedding,
    Evaluation, ExperimentConfig, LlmOverride, LlmSettings, MetricSelection, QdrantDb,
    QdrantParameters, Retriever, RunPlan,
};
pub use roster::{AgentIdPolicy, AgentRoster, RosterError};
pub use validation::{ValidationReport, Validator};
