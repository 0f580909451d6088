//! Saved config service
//!
//! Named configs kept between sessions: CRUD, field edits through the path
//! mutator and agent roster operations. Field edits are never blocked by
//! validation; only creating a new config requires a clean checklist.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::catalog::{CatalogOption, CatalogProvider};
use crate::domain::document::FieldPath;
use crate::domain::experiment::{
    apply_edit, AgentIdPolicy, AgentRoster, ExperimentConfig, ValidationReport, Validator,
};
use crate::domain::saved_config::{SavedConfig, SavedConfigId, SavedConfigRepository};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_config_save, record_validation};

/// A stored config together with its current checklist
#[derive(Debug, Clone)]
pub struct SavedConfigEdit {
    pub saved: SavedConfig,
    pub report: ValidationReport,
    /// Index of the agent the edit created, if any
    pub agent_index: Option<usize>,
}

/// Result of one roster operation
enum RosterChange {
    /// Config edited; the index of the new agent, if one was added
    Changed(Option<usize>),
    /// Nothing to do, e.g. every agent type already in use
    Unchanged,
}

impl From<Option<usize>> for RosterChange {
    fn from(added: Option<usize>) -> Self {
        match added {
            Some(index) => Self::Changed(Some(index)),
            None => Self::Unchanged,
        }
    }
}

#[derive(Debug)]
pub struct SavedConfigService {
    repository: Arc<dyn SavedConfigRepository>,
    catalog: Arc<dyn CatalogProvider>,
    validator: Validator,
}

impl SavedConfigService {
    pub fn new(
        repository: Arc<dyn SavedConfigRepository>,
        catalog: Arc<dyn CatalogProvider>,
        validator: Validator,
    ) -> Self {
        Self {
            repository,
            catalog,
            validator,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    // ========================================================================
    // CRUD Operations
    // ========================================================================

    pub async fn list(&self) -> Result<Vec<SavedConfig>, DomainError> {
        self.repository.list().await
    }

    pub async fn get(&self, id: &str) -> Result<SavedConfig, DomainError> {
        let id = SavedConfigId::new(id)?;
        self.repository
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Saved config '{}' not found", id)))
    }

    /// Saves a new config; it must pass validation and carry an unused name
    #[instrument(skip(self, config), fields(name = %config.name))]
    pub async fn create(&self, config: ExperimentConfig) -> Result<SavedConfig, DomainError> {
        let report = self.validate(&config);
        if !report.is_valid {
            return Err(DomainError::validation(report.joined()));
        }

        self.ensure_unique_name(&config.name, None).await?;

        let saved = self.repository.create(SavedConfig::new(config)).await?;
        record_config_save("create");
        info!(id = %saved.id(), "Saved config created");

        Ok(saved)
    }

    /// Replaces the whole config of an existing entry
    pub async fn replace(
        &self,
        id: &str,
        config: ExperimentConfig,
    ) -> Result<SavedConfigEdit, DomainError> {
        let mut saved = self.get(id).await?;
        if !saved.has_name(&config.name) {
            self.ensure_unique_name(&config.name, Some(saved.id())).await?;
        }

        saved.set_config(config);
        self.store(saved, None).await
    }

    /// Sets one field by path and returns the new checklist
    #[instrument(skip(self, value), fields(path = %path))]
    pub async fn set_field(
        &self,
        id: &str,
        path: &FieldPath,
        value: Value,
    ) -> Result<SavedConfigEdit, DomainError> {
        let mut saved = self.get(id).await?;
        let edited = apply_edit(saved.config(), path, value)?;

        if !saved.has_name(&edited.name) {
            self.ensure_unique_name(&edited.name, Some(saved.id())).await?;
        }

        saved.set_config(edited);
        self.store(saved, None).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = SavedConfigId::new(id)?;
        if !self.repository.delete(&id).await? {
            return Err(DomainError::not_found(format!(
                "Saved config '{}' not found",
                id
            )));
        }

        record_config_save("delete");
        info!(id = %id, "Saved config deleted");
        Ok(())
    }

    pub async fn validation(&self, id: &str) -> Result<ValidationReport, DomainError> {
        let saved = self.get(id).await?;
        Ok(self.validate(saved.config()))
    }

    /// Copies a saved config under `"<name> Copy"`, numbered until unique
    pub async fn duplicate(&self, id: &str) -> Result<SavedConfig, DomainError> {
        let source = self.get(id).await?;
        let name = self.copy_name(source.name()).await?;

        let config = ExperimentConfig {
            name: name.clone(),
            ..source.config().clone()
        };
        let copy = self.repository.create(SavedConfig::new(config)).await?;
        record_config_save("duplicate");
        info!(source = %source.id(), id = %copy.id(), name = %name, "Saved config duplicated");

        Ok(copy)
    }

    // ========================================================================
    // Agent Roster
    // ========================================================================

    /// Under the by-type policy with every type taken this is a no-op:
    /// nothing is stored and `agent_index` is `None`
    pub async fn add_agent(&self, id: &str) -> Result<SavedConfigEdit, DomainError> {
        self.edit_roster(id, |roster, config| Ok(roster.add(config).into()))
            .await
    }

    pub async fn duplicate_agent(
        &self,
        id: &str,
        index: usize,
    ) -> Result<SavedConfigEdit, DomainError> {
        self.edit_roster(id, |roster, config| Ok(roster.duplicate(config, index)?.into()))
            .await
    }

    pub async fn change_agent_type(
        &self,
        id: &str,
        index: usize,
        agent_type: &str,
    ) -> Result<SavedConfigEdit, DomainError> {
        self.edit_roster(id, |roster, config| {
            roster.change_type(config, index, agent_type)?;
            Ok(RosterChange::Changed(None))
        })
        .await
    }

    pub async fn remove_agent(&self, id: &str, index: usize) -> Result<SavedConfigEdit, DomainError> {
        self.edit_roster(id, |roster, config| {
            let removed = roster.remove(config, index)?;
            debug!(agent_id = %removed.id, "Agent removed");
            Ok(RosterChange::Changed(None))
        })
        .await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn validate(&self, config: &ExperimentConfig) -> ValidationReport {
        let report = self.validator.report(config);
        record_validation(report.is_valid);
        report
    }

    async fn agent_types(&self) -> Result<Vec<CatalogOption>, DomainError> {
        match self.validator.policy() {
            AgentIdPolicy::Sequential => Ok(Vec::new()),
            AgentIdPolicy::ByType => Ok(self.catalog.catalog().await?.agent_types),
        }
    }

    async fn edit_roster<F>(&self, id: &str, change: F) -> Result<SavedConfigEdit, DomainError>
    where
        F: FnOnce(&AgentRoster<'_>, &mut ExperimentConfig) -> Result<RosterChange, DomainError>,
    {
        let mut saved = self.get(id).await?;
        let agent_types = self.agent_types().await?;
        let roster = AgentRoster::new(self.validator.policy(), &agent_types);

        let mut config = saved.config().clone();
        match change(&roster, &mut config)? {
            RosterChange::Changed(agent_index) => {
                saved.set_config(config);
                self.store(saved, agent_index).await
            }
            RosterChange::Unchanged => {
                debug!(id = %saved.id(), "No agent type left, roster unchanged");
                let report = self.validate(saved.config());
                Ok(SavedConfigEdit {
                    saved,
                    report,
                    agent_index: None,
                })
            }
        }
    }

    async fn store(
        &self,
        saved: SavedConfig,
        agent_index: Option<usize>,
    ) -> Result<SavedConfigEdit, DomainError> {
        let saved = self.repository.update(saved).await?;
        record_config_save("update");

        let report = self.validate(saved.config());
        debug!(id = %saved.id(), errors = report.errors.len(), "Saved config updated");

        Ok(SavedConfigEdit {
            saved,
            report,
            agent_index,
        })
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        except: Option<&SavedConfigId>,
    ) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Ok(());
        }

        match self.repository.find_by_name(name).await? {
            Some(existing) if Some(existing.id()) != except => Err(DomainError::conflict(
                format!("A saved config named '{}' already exists", name.trim()),
            )),
            _ => Ok(()),
        }
    }

    async fn copy_name(&self, name: &str) -> Result<String, DomainError> {
        let base = format!("{} Copy", name.trim());
        let mut candidate = base.clone();
        let mut counter = 2;

        while self.repository.find_by_name(&candidate).await?.is_some() {
            candidate = format!("{} {}", base, counter);
            counter += 1;
        }

        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Catalog, MockCatalogProvider};
    use crate::domain::experiment::Agent;
    use crate::field_path;
    use crate::infrastructure::saved_config::StorageSavedConfigRepository;
    use crate::infrastructure::storage::InMemoryStorage;
    use serde_json::json;

    fn valid_config(name: &str) -> ExperimentConfig {
        serde_json::from_value(json!({
            "name": name,
            "data_ingestion": {"dataset_id": "finance"},
            "chunking": {"chunking_type": "recursive"},
            "qdrant_db": {"parameters": {"embedding": {
                "embedding_type": "bedrock",
                "embedding_model": "titan"
            }}},
            "agents": [{
                "id": "agent-1",
                "name": "Agent 1",
                "agent_type": "rag_agent",
                "retriever": {"retriever_type": "dense", "top_k": 5},
                "llm": {"llm_type": "bedrock", "model": "claude", "region": "us-east-1", "temperature": 0.0}
            }],
            "evaluation": {
                "metrics": {"generation": ["faithfulness"]},
                "judge_llm": {"llm_type": "bedrock", "model": "claude", "region": "us-east-1", "temperature": 0.0}
            }
        }))
        .unwrap()
    }

    fn catalog_mock() -> MockCatalogProvider {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_catalog().returning(|| {
            Ok(Catalog {
                agent_types: vec![
                    CatalogOption::new("rag_agent", "RAG Agent"),
                    CatalogOption::new("react_agent", "ReAct Agent"),
                ],
                ..Catalog::default()
            })
        });
        catalog
    }

    fn service(policy: AgentIdPolicy) -> SavedConfigService {
        SavedConfigService::new(
            Arc::new(StorageSavedConfigRepository::new(Arc::new(InMemoryStorage::new()))),
            Arc::new(catalog_mock()),
            Validator::new(policy),
        )
    }

    #[tokio::test]
    async fn test_create_requires_valid_config() {
        let service = service(AgentIdPolicy::Sequential);

        let err = service.create(ExperimentConfig::empty()).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("Experiment name is required."));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let service = service(AgentIdPolicy::Sequential);
        service.create(valid_config("Baseline")).await.unwrap();

        let err = service.create(valid_config("  baseline ")).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_set_field_not_blocked_by_validation() {
        let service = service(AgentIdPolicy::Sequential);
        let saved = service.create(valid_config("Baseline")).await.unwrap();

        let edit = service
            .set_field(saved.id().as_str(), &field_path!("agents", 0usize, "llm", "model"), json!(""))
            .await
            .unwrap();

        assert!(!edit.report.is_valid);
        assert_eq!(edit.saved.config().agents[0].llm.model, "");
        assert!(edit.saved.updated_at() > saved.updated_at());
    }

    #[tokio::test]
    async fn test_set_field_rename_checks_uniqueness() {
        let service = service(AgentIdPolicy::Sequential);
        service.create(valid_config("Baseline")).await.unwrap();
        let other = service.create(valid_config("Tuned")).await.unwrap();

        let err = service
            .set_field(other.id().as_str(), &field_path!("name"), json!("BASELINE"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        let edit = service
            .set_field(other.id().as_str(), &field_path!("name"), json!("Tuned v2"))
            .await
            .unwrap();
        assert_eq!(edit.saved.name(), "Tuned v2");
    }

    #[tokio::test]
    async fn test_set_field_bad_path_leaves_config() {
        let service = service(AgentIdPolicy::Sequential);
        let saved = service.create(valid_config("Baseline")).await.unwrap();

        let err = service
            .set_field(saved.id().as_str(), &field_path!("agents", 5usize, "name"), json!("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidPath { .. }));
        assert_eq!(service.get(saved.id().as_str()).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_duplicate_numbers_copies() {
        let service = service(AgentIdPolicy::Sequential);
        let saved = service.create(valid_config("Baseline")).await.unwrap();

        let first = service.duplicate(saved.id().as_str()).await.unwrap();
        let second = service.duplicate(saved.id().as_str()).await.unwrap();

        assert_eq!(first.name(), "Baseline Copy");
        assert_eq!(second.name(), "Baseline Copy 2");
        assert_eq!(second.config().agents, saved.config().agents);
        assert_ne!(first.id(), saved.id());
    }

    #[tokio::test]
    async fn test_sequential_roster_operations() {
        let service = service(AgentIdPolicy::Sequential);
        let saved = service.create(valid_config("Baseline")).await.unwrap();
        let id = saved.id().as_str();

        let added = service.add_agent(id).await.unwrap();
        assert_eq!(added.agent_index, Some(1));
        assert_eq!(added.saved.config().agents[1], Agent::for_slot(2));

        let copied = service.duplicate_agent(id, 0).await.unwrap();
        assert_eq!(copied.saved.config().agents[2].id, "agent-3");
        assert_eq!(copied.saved.config().agents[2].name, "Agent 1 Copy");

        let removed = service.remove_agent(id, 1).await.unwrap();
        assert_eq!(removed.saved.config().agents.len(), 2);

        let err = service.remove_agent(id, 9).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_by_type_roster_uses_catalog() {
        let service = service(AgentIdPolicy::ByType);
        let mut config = valid_config("Baseline");
        config.agents[0].id = "rag_agent".to_string();
        let saved = service.create(config).await.unwrap();
        let id = saved.id().as_str();

        let added = service.add_agent(id).await.unwrap();
        assert_eq!(added.saved.config().agents[1].id, "react_agent");

        let unchanged = service.add_agent(id).await.unwrap();
        assert_eq!(unchanged.agent_index, None);
        assert_eq!(unchanged.saved, added.saved);
        assert_eq!(unchanged.saved.config().agents.len(), 2);

        let unchanged = service.duplicate_agent(id, 0).await.unwrap();
        assert_eq!(unchanged.agent_index, None);
        assert_eq!(unchanged.saved.updated_at(), added.saved.updated_at());

        let err = service
            .change_agent_type(id, 1, "rag_agent")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let service = service(AgentIdPolicy::Sequential);
        let saved = service.create(valid_config("Baseline")).await.unwrap();

        service.delete(saved.id().as_str()).await.unwrap();

        assert!(matches!(
            service.get(saved.id().as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(saved.id().as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.get("not-a-uuid").await,
            Err(DomainError::InvalidId { .. })
        ));
    }
}
