mod instruments;
mod snapshot;
mod watch;

use std::process::ExitCode;
use std::sync::Arc;

use tickboard_core::{MarketData, SyntheticSource, ValidatedConfig, YahooChartSource};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let config = cli.resolve_config()?;

    match &cli.command {
        Command::Watch(_) => watch::run(&config, market_data(cli, &config)).await,
        Command::Snapshot(args) => snapshot::run(args, &config, market_data(cli, &config)).await,
        Command::Instruments(args) => instruments::run(args, &config),
    }
}

fn market_data(cli: &Cli, config: &ValidatedConfig) -> Arc<dyn MarketData> {
    if cli.offline {
        Arc::new(SyntheticSource::new())
    } else {
        Arc::new(YahooChartSource::default().with_request_timeout(config.fetch_timeout))
    }
}
