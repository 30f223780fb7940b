mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod terminal;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Watch(args) => logging::init_file(args.log_file.as_deref())?,
        Command::Snapshot(_) | Command::Instruments(_) => logging::init_stderr()?,
    }

    commands::run(&cli).await
}
