//! CLI argument definitions for tickboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `watch` | Live terminal dashboard |
//! | `snapshot` | Fetch once and print KPIs |
//! | `instruments` | List configured instruments |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | none | JSON config file |
//! | `--offline` | `false` | Use the synthetic price generator |
//! | `--quote-secs` | `45` | Quote refresh interval |
//! | `--history-secs` | `1800` | History refresh interval |
//! | `--period` | `1 year` | Lookback window |
//! | `--timeout-secs` | `10` | Per-fetch timeout |
//!
//! # Examples
//!
//! ```bash
//! tickboard watch --log-file tickboard.log
//! tickboard snapshot --format json --pretty --period "6 months"
//! tickboard --config dashboard.json instruments
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickboard_core::{DashboardConfig, ValidatedConfig};

use crate::error::CliError;

/// Terminal dashboard for ETFs and ETCs.
#[derive(Debug, Parser)]
#[command(
    name = "tickboard",
    author,
    version,
    about = "Terminal dashboard for ETFs and ETCs",
    long_about = "tickboard polls daily closes for a list of ETFs and ETCs and shows \
current price, all-time high and daily, monthly and yearly change per instrument.\n\
\n\
Quotes refresh every 45 seconds and history every 30 minutes by default.\n\
\n\
Use 'tickboard <command> --help' for command-specific help."
)]
pub struct Cli {
    /// JSON config file; built-in defaults apply otherwise.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve deterministic synthetic prices instead of calling Yahoo.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Override the quote refresh interval in seconds.
    #[arg(long, global = true)]
    pub quote_secs: Option<u64>,

    /// Override the history refresh interval in seconds.
    #[arg(long, global = true)]
    pub history_secs: Option<u64>,

    /// Override the lookback window, e.g. "6 months", "1 year", "3y".
    #[arg(long, global = true)]
    pub period: Option<String>,

    /// Override the per-fetch timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads the config file (or defaults), applies flag overrides and
    /// validates the result.
    pub fn resolve_config(&self) -> Result<ValidatedConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(secs) = self.quote_secs {
            config.quote_refresh_secs = secs;
        }
        if let Some(secs) = self.history_secs {
            config.history_refresh_secs = secs;
        }
        if let Some(period) = &self.period {
            config.lookback = period.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.fetch_timeout_secs = secs;
        }

        Ok(config.validate()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    Table,
    /// Single JSON document.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the live dashboard until `q` or `Esc`.
    ///
    /// Keys: `r` refresh now, `1` 6M, `2` 1Y, `3` 3Y.
    Watch(WatchArgs),

    /// Fetch every instrument once and print the KPIs.
    Snapshot(SnapshotArgs),

    /// Print the configured instrument list.
    Instruments(InstrumentsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Append logs to this file; logs are discarded otherwise.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct InstrumentsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
