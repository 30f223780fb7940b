use std::process::ExitCode;

use tickboard_core::ValidatedConfig;

use crate::cli::InstrumentsArgs;
use crate::error::CliError;
use crate::output;

pub fn run(args: &InstrumentsArgs, config: &ValidatedConfig) -> Result<ExitCode, CliError> {
    output::render_instruments(&config.instruments, args.format)?;
    Ok(ExitCode::SUCCESS)
}
