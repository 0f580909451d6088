//! Agent add, duplicate, retype and remove rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::slot_id;
use super::entity::{Agent, ExperimentConfig};
use crate::domain::catalog::CatalogOption;
use crate::domain::DomainError;

/// How agents are identified within one experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentIdPolicy {
    /// Free-form unique ids, `agent-n` for new slots
    #[default]
    Sequential,
    /// At most one agent per catalog agent type; id and name follow the type
    ByType,
}

impl fmt::Display for AgentIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::ByType => write!(f, "by_type"),
        }
    }
}

impl FromStr for AgentIdPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "slot" => Ok(Self::Sequential),
            "by_type" | "by-type" | "bytype" | "type" => Ok(Self::ByType),
            other => Err(DomainError::configuration(format!(
                "Unknown agent id policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Agent index {index} is out of range for {len} agents")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Agent type '{0}' is not in the catalog")]
    UnknownAgentType(String),

    #[error("Agent type '{0}' is already used by another agent")]
    AgentTypeInUse(String),
}

impl From<RosterError> for DomainError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::IndexOutOfRange { .. } => DomainError::not_found(err.to_string()),
            RosterError::UnknownAgentType(_) => DomainError::validation(err.to_string()),
            RosterError::AgentTypeInUse(_) => DomainError::conflict(err.to_string()),
        }
    }
}

/// Applies the active id policy to the agent list of a config
///
/// Agent types are only consulted under [`AgentIdPolicy::ByType`].
#[derive(Debug, Clone, Copy)]
pub struct AgentRoster<'a> {
    policy: AgentIdPolicy,
    agent_types: &'a [CatalogOption],
}

impl<'a> AgentRoster<'a> {
    pub fn new(policy: AgentIdPolicy, agent_types: &'a [CatalogOption]) -> Self {
        Self {
            policy,
            agent_types,
        }
    }

    pub fn sequential() -> AgentRoster<'static> {
        AgentRoster {
            policy: AgentIdPolicy::Sequential,
            agent_types: &[],
        }
    }

    pub fn policy(&self) -> AgentIdPolicy {
        self.policy
    }

    /// First free `agent-n` slot, starting after the current length
    pub fn next_slot(config: &ExperimentConfig) -> usize {
        let mut slot = config.agents.len() + 1;
        while config.has_agent_id(&slot_id(slot)) {
            slot += 1;
        }
        slot
    }

    fn next_unused_type(&self, config: &ExperimentConfig) -> Option<&'a CatalogOption> {
        self.agent_types
            .iter()
            .find(|option| !config.has_agent_type(&option.id))
    }

    fn check_index(config: &ExperimentConfig, index: usize) -> Result<(), RosterError> {
        if index >= config.agents.len() {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: config.agents.len(),
            });
        }
        Ok(())
    }

    /// Appends a new agent and returns its index
    ///
    /// Returns `None` without touching the config when every catalog agent
    /// type is already in use.
    pub fn add(&self, config: &mut ExperimentConfig) -> Option<usize> {
        let agent = match self.policy {
            AgentIdPolicy::Sequential => Agent::for_slot(Self::next_slot(config)),
            AgentIdPolicy::ByType => {
                let option = self.next_unused_type(config)?;
                Agent {
                    id: option.id.clone(),
                    name: option.label.clone(),
                    agent_type: option.id.clone(),
                    ..Default::default()
                }
            }
        };

        config.agents.push(agent);
        Some(config.agents.len() - 1)
    }

    /// Appends a copy of the agent at `index` and returns the new index
    pub fn duplicate(
        &self,
        config: &mut ExperimentConfig,
        index: usize,
    ) -> Result<Option<usize>, RosterError> {
        Self::check_index(config, index)?;
        let source = &config.agents[index];

        let copy = match self.policy {
            AgentIdPolicy::Sequential => Agent {
                id: slot_id(Self::next_slot(config)),
                name: format!("{} Copy", source.name),
                ..source.clone()
            },
            AgentIdPolicy::ByType => {
                let Some(option) = self.next_unused_type(config) else {
                    return Ok(None);
                };
                Agent {
                    id: option.id.clone(),
                    name: option.label.clone(),
                    agent_type: option.id.clone(),
                    retriever: source.retriever.clone(),
                    llm: source.llm.clone(),
                    overrides: source.overrides.clone(),
                }
            }
        };

        config.agents.push(copy);
        Ok(Some(config.agents.len() - 1))
    }

    /// Sets the agent type; under the by-type policy the id and name follow
    pub fn change_type(
        &self,
        config: &mut ExperimentConfig,
        index: usize,
        agent_type: &str,
    ) -> Result<(), RosterError> {
        Self::check_index(config, index)?;

        if self.policy == AgentIdPolicy::Sequential {
            config.agents[index].agent_type = agent_type.to_string();
            return Ok(());
        }

        let option = self
            .agent_types
            .iter()
            .find(|option| option.id == agent_type)
            .ok_or_else(|| RosterError::UnknownAgentType(agent_type.to_string()))?;

        let taken = config
            .agents
            .iter()
            .enumerate()
            .any(|(i, agent)| i != index && agent.agent_type == option.id);
        if taken {
            return Err(RosterError::AgentTypeInUse(option.id.clone()));
        }

        let agent = &mut config.agents[index];
        let previous_id = std::mem::replace(&mut agent.id, option.id.clone());
        agent.agent_type = option.id.clone();
        agent.name = option.label.clone();

        for included in config.evaluation.run.include_agents.iter_mut() {
            if *included == previous_id {
                *included = option.id.clone();
            }
        }

        Ok(())
    }

    /// Removes the agent and drops it from the run plan
    pub fn remove(&self, config: &mut ExperimentConfig, index: usize) -> Result<Agent, RosterError> {
        Self::check_index(config, index)?;

        let removed = config.agents.remove(index);
        config
            .evaluation
            .run
            .include_agents
            .retain(|id| *id != removed.id);

        Ok(removed)
    }
}
