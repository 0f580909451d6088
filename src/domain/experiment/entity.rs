//! Experiment configuration document

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Data ingestion
// ============================================================================

/// Legacy direct reference to a corpus or test set file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSource {
    pub dataset_id: Option<String>,
    pub data_path: String,
    pub document_type: String,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            dataset_id: None,
            data_path: String::new(),
            document_type: "json".to_string(),
        }
    }
}

/// Dataset selection, in either the current (`dataset_id`) or legacy form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataIngestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    pub ingestion_corpus: DataSource,
    pub test_set: DataSource,
}

impl DataIngestion {
    /// The selected dataset, by priority: `dataset_id`, then the corpus
    /// `dataset_id`, then the legacy corpus `data_path`
    pub fn selected_dataset(&self) -> Option<&str> {
        [
            self.dataset_id.as_deref(),
            self.ingestion_corpus.dataset_id.as_deref(),
            Some(self.ingestion_corpus.data_path.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
    }
}

// ============================================================================
// Chunking and embedding
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingParameters {
    pub chunk_size: u32,
    pub chunk_overlap: u32,
}

impl Default for ChunkingParameters {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Chunking {
    pub chunking_type: String,
    pub parameters: ChunkingParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Embedding {
    pub embedding_type: String,
    pub embedding_model: String,
    pub embedding_length: u32,
    pub distance_metric: Option<String>,
}

impl Default for Embedding {
    fn default() -> Self {
        Self {
            embedding_type: String::new(),
            embedding_model: String::new(),
            embedding_length: 0,
            distance_metric: Some("cosine".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QdrantParameters {
    pub embedding: Embedding,
}

/// Vector store settings; only the embedding block is configurable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QdrantDb {
    pub parameters: QdrantParameters,
}

// ============================================================================
// Agents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Retriever {
    pub retriever_type: String,
    pub top_k: i64,
}

impl Default for Retriever {
    fn default() -> Self {
        Self {
            retriever_type: String::new(),
            top_k: 5,
        }
    }
}

/// Model selection shared by agents and the judge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSettings {
    pub llm_type: String,
    pub model: String,
    pub region: String,
    pub temperature: f64,
}

impl LlmSettings {
    pub fn has_model(&self) -> bool {
        !self.model.trim().is_empty()
    }
}

/// Per-agent replacements for the experiment-wide chunking and vector store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentOverrides {
    pub chunking: Option<Chunking>,
    pub qdrant_db: Option<QdrantDb>,
}

/// One RAG pipeline variant under evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub agent_type: String,
    pub retriever: Retriever,
    pub llm: LlmSettings,
    pub overrides: AgentOverrides,
}

impl Agent {
    /// Complete agents have a retriever type, a positive top-k and a model
    pub fn is_complete(&self) -> bool {
        !self.retriever.retriever_type.trim().is_empty()
            && self.retriever.top_k > 0
            && self.llm.has_model()
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Selected metric ids per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricSelection {
    pub agent: Vec<String>,
    pub retrieval: Vec<String>,
    pub generation: Vec<String>,
    pub aggregate: Vec<String>,
}

impl MetricSelection {
    pub fn total(&self) -> usize {
        self.agent.len() + self.retrieval.len() + self.generation.len() + self.aggregate.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.agent
            .iter()
            .chain(self.retrieval.iter())
            .chain(self.generation.iter())
            .chain(self.aggregate.iter())
    }
}

/// Optional model applied to every agent for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmOverride {
    pub enabled: bool,
    pub llm_type: String,
    pub model: String,
    pub region: String,
    pub temperature: f64,
}

/// Subset of agents included in a run; empty means every agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunPlan {
    pub include_agents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Evaluation {
    pub output_dir: String,
    pub metrics: MetricSelection,
    pub judge_llm: LlmSettings,
    pub llm_override: LlmOverride,
    pub run: RunPlan,
}

impl Default for Evaluation {
    fn default() -> Self {
        Self {
            output_dir: "results".to_string(),
            metrics: MetricSelection::default(),
            judge_llm: LlmSettings::default(),
            llm_override: LlmOverride::default(),
            run: RunPlan::default(),
        }
    }
}

// ============================================================================
// ExperimentConfig
// ============================================================================

/// Root document edited field by field and handed to the run backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data_ingestion: DataIngestion,
    pub chunking: Chunking,
    pub qdrant_db: QdrantDb,
    pub agents: Vec<Agent>,
    pub evaluation: Evaluation,
}

impl ExperimentConfig {
    /// Parses a JSON document, rejecting unknown fields
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn embedding(&self) -> &Embedding {
        &self.qdrant_db.parameters.embedding
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|agent| agent.id.as_str())
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn has_agent_id(&self, id: &str) -> bool {
        self.agents.iter().any(|agent| agent.id == id)
    }

    pub fn has_agent_type(&self, agent_type: &str) -> bool {
        self.agents.iter().any(|agent| agent.agent_type == agent_type)
    }

    // ------------------------------------------------------------------------
    // Run plan
    // ------------------------------------------------------------------------

    /// Agents taking part in a run, in roster order
    pub fn included_agents(&self) -> Vec<&Agent> {
        let include = &self.evaluation.run.include_agents;
        if include.is_empty() {
            return self.agents.iter().collect();
        }
        self.agents
            .iter()
            .filter(|agent| include.contains(&agent.id))
            .collect()
    }

    /// Adds the id to the run plan, or removes it when already present
    pub fn toggle_included(&mut self, id: &str) {
        let include = &mut self.evaluation.run.include_agents;
        if let Some(position) = include.iter().position(|existing| existing == id) {
            include.remove(position);
        } else {
            include.push(id.to_string());
        }
    }

    /// Lists every current agent explicitly
    pub fn include_all(&mut self) {
        self.evaluation.run.include_agents = self.agent_ids().map(str::to_string).collect();
    }

    /// Empties the run plan, which means every agent runs
    pub fn clear_included(&mut self) {
        self.evaluation.run.include_agents.clear();
    }
}
