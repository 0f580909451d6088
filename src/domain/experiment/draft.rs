//! Editable config held by one editing session

use once_cell::sync::OnceCell;
use serde_json::Value;
use thiserror::Error;

use super::entity::ExperimentConfig;
use super::validation::{ValidationReport, Validator};
use crate::domain::document::{set_in_place, FieldPath, PathError};
use crate::domain::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DraftError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("edit at '{path}' does not fit the config schema: {reason}")]
    Schema { path: String, reason: String },
}

impl From<DraftError> for DomainError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::Path(_) => DomainError::invalid_path(err.to_string()),
            DraftError::Schema { .. } => DomainError::validation(err.to_string()),
        }
    }
}

/// Applies one field edit to a config, returning the edited copy
///
/// The edit goes through the JSON form, so the result is re-checked against
/// the closed schema: unknown keys and wrongly typed values are rejected.
pub fn apply_edit(
    config: &ExperimentConfig,
    path: &FieldPath,
    value: Value,
) -> Result<ExperimentConfig, DraftError> {
    let schema_error = |e: serde_json::Error| DraftError::Schema {
        path: path.to_string(),
        reason: e.to_string(),
    };

    let mut document = config.to_value().map_err(schema_error)?;
    set_in_place(&mut document, path, value)?;
    ExperimentConfig::from_value(document).map_err(schema_error)
}

/// Current config plus its memoized checklist
#[derive(Debug)]
pub struct ConfigDraft {
    config: ExperimentConfig,
    validator: Validator,
    errors: OnceCell<Vec<String>>,
}

impl ConfigDraft {
    pub fn new(config: ExperimentConfig, validator: Validator) -> Self {
        Self {
            config,
            validator,
            errors: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn into_config(self) -> ExperimentConfig {
        self.config
    }

    /// Replaces the value at `path`; on error the draft is left as it was
    pub fn update(&mut self, path: &FieldPath, value: Value) -> Result<(), DraftError> {
        let next = apply_edit(&self.config, path, value)?;
        self.replace(next);
        Ok(())
    }

    /// Swaps in a whole new config
    pub fn replace(&mut self, config: ExperimentConfig) {
        self.config = config;
        self.errors = OnceCell::new();
    }

    /// Applies a structural change (roster edits) in place
    pub fn modify<T>(&mut self, change: impl FnOnce(&mut ExperimentConfig) -> T) -> T {
        let out = change(&mut self.config);
        self.errors = OnceCell::new();
        out
    }

    pub fn errors(&self) -> &[String] {
        self.errors
            .get_or_init(|| self.validator.validate(&self.config))
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport::new(self.errors().to_vec())
    }
}
