//! Validate command - prints the checklist of one config

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use crate::domain::{AgentIdPolicy, Validator};
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Config file (JSON), `-` for standard input
    pub file: PathBuf,

    /// Agent id policy: sequential or by_type
    #[arg(long, default_value_t = AgentIdPolicy::Sequential)]
    pub policy: AgentIdPolicy,
}

/// Exits with 1 when the config has validation errors
pub fn run(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    logging::init_cli_logging("warn");

    let config = super::read_config(&args.file)?;
    let report = Validator::new(args.policy).report(&config);

    print!("{}", render_report(&config.name, &report.errors));

    if report.is_valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn render_report(name: &str, errors: &[String]) -> String {
    let label = if name.trim().is_empty() { "(unnamed)" } else { name };

    if errors.is_empty() {
        return format!("{}: ready to run\n", label);
    }

    let mut out = format!("{}: {} problem(s)\n", label, errors.len());
    for error in errors {
        out.push_str("  - ");
        out.push_str(error);
        out.push('\n');
    }
    out
}
