use std::process::ExitCode;
use std::sync::Arc;

use tickboard_core::{
    Dashboard, FrameSink, InstrumentStatus, MarketData, SystemClock, ValidatedConfig,
};

use crate::cli::SnapshotArgs;
use crate::error::CliError;
use crate::output::SnapshotSink;

/// One tick against a fresh dashboard, then print the frame. Exits with 3
/// when any instrument has no data.
pub async fn run(
    args: &SnapshotArgs,
    config: &ValidatedConfig,
    source: Arc<dyn MarketData>,
) -> Result<ExitCode, CliError> {
    let mut dashboard = Dashboard::new(config, source, SystemClock);
    let report = dashboard.tick().await;
    let frame = dashboard.frame();

    let mut sink = SnapshotSink::new(std::io::stdout(), args.format, args.pretty);
    sink.render(&frame)?;

    let missing = frame
        .panels
        .iter()
        .filter(|panel| matches!(panel.status, InstrumentStatus::NoData(_)))
        .count();
    tracing::debug!(failures = report.failures.len(), missing, "snapshot complete");

    if missing > 0 {
        return Ok(ExitCode::from(3));
    }
    Ok(ExitCode::SUCCESS)
}
