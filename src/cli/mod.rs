//! CLI module for AgentLab
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `validate`: print the checklist of a config file
//! - `set`: apply one field edit to a config file

pub mod serve;
pub mod set;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::domain::ExperimentConfig;

/// AgentLab - configure, launch and review RAG agent experiments
#[derive(Parser)]
#[command(name = "agentlab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Validate an experiment config file
    Validate(validate::ValidateArgs),

    /// Set one field of an experiment config file and print the result
    Set(set::SetArgs),
}

/// Reads and parses a config file; `-` reads standard input
pub(crate) fn read_config(path: &Path) -> anyhow::Result<ExperimentConfig> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read standard input")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid experiment config", path.display()))
}
