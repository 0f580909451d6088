//! Starting documents for new drafts and new agents

use super::entity::{Agent, ExperimentConfig};

/// Id used by the sequential policy for the agent in 1-based `slot`
pub fn slot_id(slot: usize) -> String {
    format!("agent-{}", slot)
}

impl Agent {
    /// Blank agent occupying the given 1-based slot
    pub fn for_slot(slot: usize) -> Self {
        Self {
            id: slot_id(slot),
            name: format!("Agent {}", slot),
            ..Default::default()
        }
    }
}

impl ExperimentConfig {
    /// All fields blank, no agents
    pub fn empty() -> Self {
        Self::default()
    }

    /// Blank document seeded with a single default agent
    pub fn seeded() -> Self {
        Self {
            agents: vec![Agent::for_slot(1)],
            ..Self::default()
        }
    }
}
