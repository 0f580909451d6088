//! Submission checklist for experiment configs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity::ExperimentConfig;
use super::roster::AgentIdPolicy;

/// Ordered blocking problems; the config is submittable when empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// All messages on one line, for error payloads
    pub fn joined(&self) -> String {
        self.errors.join(" ")
    }
}

/// Computes the checklist under a given agent id policy
///
/// Rules run in a fixed order so the output is stable for identical input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    policy: AgentIdPolicy,
}

impl Validator {
    pub fn new(policy: AgentIdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AgentIdPolicy {
        self.policy
    }

    pub fn report(&self, config: &ExperimentConfig) -> ValidationReport {
        ValidationReport::new(self.validate(config))
    }

    pub fn validate(&self, config: &ExperimentConfig) -> Vec<String> {
        let mut errors = Vec::new();

        if config.name.trim().is_empty() {
            errors.push("Experiment name is required.".to_string());
        }
        if config.data_ingestion.selected_dataset().is_none() {
            errors.push("Select a dataset.".to_string());
        }
        if is_blank(&config.embedding().embedding_model) {
            errors.push("Select an embedding model.".to_string());
        }
        if is_blank(&config.chunking.chunking_type) {
            errors.push("Select a chunking strategy.".to_string());
        }

        if config.agents.is_empty() {
            errors.push("Add at least one agent.".to_string());
        }
        for (i, agent) in config.agents.iter().enumerate() {
            let n = i + 1;
            if is_blank(&agent.retriever.retriever_type) {
                errors.push(format!("Agent {}: select a retriever type.", n));
            }
            if agent.retriever.top_k <= 0 {
                errors.push(format!("Agent {}: set Top K (> 0).", n));
            }
            if !agent.llm.has_model() {
                errors.push(format!("Agent {}: select an LLM model.", n));
            }
        }

        if config.evaluation.metrics.total() < 1 {
            errors.push("Select at least one evaluation metric.".to_string());
        }
        if !config.evaluation.judge_llm.has_model() {
            errors.push("Select an evaluator (judge) model.".to_string());
        }

        self.check_agent_identity(config, &mut errors);

        for (i, agent) in config.agents.iter().enumerate() {
            let temperature = agent.llm.temperature;
            if !(0.0..=2.0).contains(&temperature) {
                errors.push(format!(
                    "Agent {}: temperature must be between 0 and 2.",
                    i + 1
                ));
            }
        }

        for id in &config.evaluation.run.include_agents {
            if !config.has_agent_id(id) {
                errors.push(format!("Run plan references unknown agent '{}'.", id));
            }
        }

        errors
    }

    /// Reports each repeat of an id (or of a type under the by-type policy)
    /// on the later agent
    fn check_agent_identity(&self, config: &ExperimentConfig, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();

        for (i, agent) in config.agents.iter().enumerate() {
            let key = match self.policy {
                AgentIdPolicy::Sequential => agent.id.as_str(),
                AgentIdPolicy::ByType => agent.agent_type.as_str(),
            };
            if is_blank(key) || seen.insert(key) {
                continue;
            }

            errors.push(match self.policy {
                AgentIdPolicy::Sequential => {
                    format!("Agent {}: duplicate agent id '{}'.", i + 1, key)
                }
                AgentIdPolicy::ByType => {
                    format!("Agent {}: agent type '{}' is already used.", i + 1, key)
                }
            });
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
