//! Set command - applies one path edit to a config file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::domain::document::FieldPath;
use crate::domain::experiment::apply_edit;
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Config file (JSON), `-` for standard input
    pub file: PathBuf,

    /// Field path such as `agents[0].llm.model`
    pub path: String,

    /// New value as JSON; bare words are taken as strings
    pub value: String,

    /// Write the result back to the file instead of printing it
    #[arg(long)]
    pub in_place: bool,
}

pub fn run(args: SetArgs) -> anyhow::Result<()> {
    logging::init_cli_logging("warn");

    let config = super::read_config(&args.file)?;
    let path: FieldPath = args
        .path
        .parse()
        .with_context(|| format!("Invalid path '{}'", args.path))?;

    let edited = apply_edit(&config, &path, parse_value(&args.value))?;
    let rendered = serde_json::to_string_pretty(&edited)?;

    if args.in_place && args.file.as_os_str() != "-" {
        std::fs::write(&args.file, format!("{}\n", rendered))
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
        tracing::info!(file = %args.file.display(), path = %path, "Updated config");
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
