//! Selectable option sets offered by the evaluation backend

use serde::{Deserialize, Serialize};

/// An `{id, label}` pair shown in a picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: String,
    pub label: String,
}

impl CatalogOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricOption {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl MetricOption {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Evaluation metrics grouped by what they score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricGroups {
    pub retrieval: Vec<MetricOption>,
    pub agent: Vec<MetricOption>,
    pub generation: Vec<MetricOption>,
    pub aggregate: Vec<MetricOption>,
}

impl MetricGroups {
    /// Every metric id across the four groups
    pub fn all_ids(&self) -> Vec<&str> {
        self.retrieval
            .iter()
            .chain(&self.agent)
            .chain(&self.generation)
            .chain(&self.aggregate)
            .map(|metric| metric.id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub agent_types: Vec<CatalogOption>,
    pub chunking_strategies: Vec<CatalogOption>,
    pub embedding_models: Vec<CatalogOption>,
    pub llm_interfaces: Vec<CatalogOption>,
    pub retriever_types: Vec<CatalogOption>,
    pub evaluation_metrics_grouped: MetricGroups,
    pub llm_models: Vec<CatalogOption>,
}

fn contains(options: &[CatalogOption], id: &str) -> bool {
    options.iter().any(|option| option.id == id)
}

impl Catalog {
    pub fn agent_type(&self, id: &str) -> Option<&CatalogOption> {
        self.agent_types.iter().find(|option| option.id == id)
    }

    pub fn is_known_agent_type(&self, id: &str) -> bool {
        contains(&self.agent_types, id)
    }

    pub fn is_known_chunking_strategy(&self, id: &str) -> bool {
        contains(&self.chunking_strategies, id)
    }

    pub fn is_known_embedding_model(&self, id: &str) -> bool {
        contains(&self.embedding_models, id)
    }

    pub fn is_known_retriever_type(&self, id: &str) -> bool {
        contains(&self.retriever_types, id)
    }

    pub fn is_known_llm_model(&self, id: &str) -> bool {
        contains(&self.llm_models, id)
    }

    pub fn is_known_metric(&self, id: &str) -> bool {
        self.evaluation_metrics_grouped.all_ids().contains(&id)
    }
}
