use std::process::ExitCode;

use agentlab::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await.map(|()| ExitCode::SUCCESS),
        Command::Validate(args) => cli::validate::run(args),
        Command::Set(args) => cli::set::run(args).map(|()| ExitCode::SUCCESS),
    }
}
