use std::io::Write;

use tickboard_core::{
    DashboardFrame, FrameSink, InstrumentMeta, InstrumentStatus, PanelView, SinkError,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// One-shot frame writer for the `snapshot` command.
pub struct SnapshotSink<W> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write + Send> SnapshotSink<W> {
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }
}

impl<W: Write + Send> FrameSink for SnapshotSink<W> {
    fn render(&mut self, frame: &DashboardFrame) -> Result<(), SinkError> {
        match self.format {
            OutputFormat::Json => {
                let payload = if self.pretty {
                    serde_json::to_string_pretty(frame)
                } else {
                    serde_json::to_string(frame)
                }
                .map_err(|e| SinkError::Encode(e.to_string()))?;
                writeln!(self.writer, "{payload}")?;
            }
            OutputFormat::Table => {
                for line in snapshot_table(frame) {
                    writeln!(self.writer, "{line}")?;
                }
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub fn render_instruments(
    instruments: &[InstrumentMeta],
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(instruments)?),
        OutputFormat::Table => {
            println!("{:<10} {:<14} NAME", "SYMBOL", "IDENTIFIER");
            for meta in instruments {
                println!("{:<10} {:<14} {}", meta.symbol, meta.identifier, meta.name);
            }
        }
    }
    Ok(())
}

fn snapshot_table(frame: &DashboardFrame) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} | period {} | {}",
            frame.header.title,
            frame.header.period.label(),
            frame.header.clock
        ),
        format!(
            "{:<10} {:>10} {:>10} {:>9} {:>9} {:>9} {:>9}  STATUS",
            "SYMBOL", "CURRENT", "ATH", "DAILY", "MONTHLY", "YEARLY", "Δ ATH"
        ),
    ];
    lines.extend(frame.panels.iter().map(panel_row));
    lines
}

fn panel_row(panel: &PanelView) -> String {
    let cell = |index: usize| {
        panel
            .kpis
            .get(index)
            .map(|kpi| kpi.text.as_str())
            .unwrap_or_default()
    };
    format!(
        "{:<10} {:>10} {:>10} {:>9} {:>9} {:>9} {:>9}  {}",
        panel.meta.symbol.as_str(),
        cell(0),
        cell(1),
        cell(2),
        cell(3),
        cell(4),
        cell(5),
        status_text(&panel.status)
    )
}

fn status_text(status: &InstrumentStatus) -> String {
    match status {
        InstrumentStatus::Loading => String::from("loading"),
        InstrumentStatus::Ready => String::from("ok"),
        InstrumentStatus::Stale(reason) => format!("stale: {reason}"),
        InstrumentStatus::NoData(reason) => format!("no data: {reason}"),
    }
}
