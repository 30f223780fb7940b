use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tickboard_core::{
    Dashboard, DashboardControl, IntervalTicker, MarketData, SystemClock, ValidatedConfig,
};
use tokio::sync::{mpsc, watch};

use crate::error::CliError;
use crate::terminal::{key_action, KeyAction, TerminalSink};

const INPUT_POLL: Duration = Duration::from_millis(100);

pub async fn run(
    config: &ValidatedConfig,
    source: Arc<dyn MarketData>,
) -> Result<ExitCode, CliError> {
    let mut dashboard = Dashboard::new(config, source, SystemClock);
    let mut ticker = IntervalTicker::new(config.tick_interval);
    let (stop_tx, stop_rx) = watch::channel(false);
    let (controls_tx, controls_rx) = mpsc::unbounded_channel();

    let mut sink = TerminalSink::new()?;
    let input = tokio::task::spawn_blocking(move || read_keys(stop_tx, controls_tx));

    let result = dashboard
        .run_with_controls(&mut ticker, &mut sink, stop_rx, controls_rx)
        .await;
    drop(sink);

    // The controls receiver is gone by now, which ends the input thread.
    let input_result = input
        .await
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    result?;
    input_result?;

    Ok(ExitCode::SUCCESS)
}

/// Polls the keyboard until quit is pressed or the dashboard loop is gone.
fn read_keys(
    stop: watch::Sender<bool>,
    controls: mpsc::UnboundedSender<DashboardControl>,
) -> Result<(), CliError> {
    while !controls.is_closed() {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key_action(key) {
            Some(KeyAction::Quit) => {
                let _ = stop.send(true);
                break;
            }
            Some(KeyAction::Control(control)) => {
                if controls.send(control).is_err() {
                    break;
                }
            }
            None => {}
        }
    }
    Ok(())
}
