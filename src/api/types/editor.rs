//! Request and response bodies of the editor endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::document::FieldPath;
use crate::domain::experiment::{ExperimentConfig, ValidationReport};
use crate::domain::saved_config::SavedConfig;
use crate::domain::DomainError;
use crate::infrastructure::services::SavedConfigEdit;

/// A path given either as `"agents[0].llm.model"` or as a segment array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathInput {
    Text(String),
    Segments(FieldPath),
}

impl PathInput {
    pub fn parse(self) -> Result<FieldPath, DomainError> {
        match self {
            Self::Text(text) => text.parse().map_err(DomainError::from),
            Self::Segments(path) => Ok(path),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmptyDraftQuery {
    /// Start with one default agent
    #[serde(default)]
    pub seeded: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateDraftRequest {
    pub config: ExperimentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetDraftFieldRequest {
    pub config: ExperimentConfig,
    pub path: PathInput,
    pub value: Value,
}

/// A config after an edit, with its checklist
#[derive(Debug, Clone, Serialize)]
pub struct DraftResponse {
    pub config: ExperimentConfig,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigBody {
    pub config: ExperimentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetFieldRequest {
    pub path: PathInput,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeAgentTypeRequest {
    pub agent_type: String,
}

/// Saved config plus the checklist of its current state
#[derive(Debug, Clone, Serialize)]
pub struct SavedConfigResponse {
    #[serde(flatten)]
    pub saved: SavedConfig,
    pub validation: ValidationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_index: Option<usize>,
}

impl From<SavedConfigEdit> for SavedConfigResponse {
    fn from(edit: SavedConfigEdit) -> Self {
        Self {
            saved: edit.saved,
            validation: edit.report,
            agent_index: edit.agent_index,
        }
    }
}
