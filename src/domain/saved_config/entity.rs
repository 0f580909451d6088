//! Saved config entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::experiment::ExperimentConfig;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::DomainError;

// ============================================================================
// SavedConfigId
// ============================================================================

/// Generated identifier of a saved config
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SavedConfigId(String);

impl SavedConfigId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parses an id, which must be a UUID
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        Uuid::parse_str(&id)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid config id", id)))?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SavedConfigId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SavedConfigId> for String {
    fn from(id: SavedConfigId) -> Self {
        id.0
    }
}

impl fmt::Display for SavedConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SavedConfigId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl StorageKey for SavedConfigId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SavedConfig
// ============================================================================

/// A named experiment config persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConfig {
    id: SavedConfigId,
    name: String,
    config: ExperimentConfig,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SavedConfig {
    /// Wraps a config under a fresh id; the name is taken from the config
    pub fn new(config: ExperimentConfig) -> Self {
        let now = Utc::now();
        Self {
            id: SavedConfigId::generate(),
            name: config.name.trim().to_string(),
            config,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SavedConfigId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Case-insensitive comparison on the trimmed name
    pub fn has_name(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }

    /// Replaces the config, keeping the name in sync and bumping `updatedAt`
    pub fn set_config(&mut self, config: ExperimentConfig) {
        self.name = config.name.trim().to_string();
        self.config = config;
        self.touch();
    }

    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}

impl StorageEntity for SavedConfig {
    type Key = SavedConfigId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Key used for name uniqueness
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
