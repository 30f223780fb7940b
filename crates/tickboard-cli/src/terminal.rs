//! ratatui renderer for the live dashboard.
//!
//! Layout: one header row (title, period tabs, quote countdown gauge, UTC
//! clock) above a grid of instrument panels. Each panel lists the KPI rows
//! and draws the history as a braille line chart.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, Gauge, GraphType, Paragraph, Tabs};
use ratatui::{DefaultTerminal, Frame};
use tickboard_core::{
    ChartArtifact, DashboardControl, DashboardFrame, FormattedKpi, FrameSink, HeaderView,
    InstrumentStatus, LookbackPeriod, PanelView, SinkError, Trend, UtcDateTime,
};

const HEADER_HEIGHT: u16 = 3;
const KPI_HEIGHT: u16 = 8;
const WIDE_LAYOUT_COLUMNS: usize = 3;
const WIDE_LAYOUT_MIN_WIDTH: u16 = 150;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Control(DashboardControl),
}

pub fn key_action(key: KeyEvent) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('r') => Some(KeyAction::Control(DashboardControl::Refresh)),
        KeyCode::Char(digit @ '1'..='3') => {
            let index = digit as usize - '1' as usize;
            LookbackPeriod::TOGGLE
                .get(index)
                .map(|period| KeyAction::Control(DashboardControl::SelectPeriod(*period)))
        }
        _ => None,
    }
}

/// Owns the terminal in raw mode; restores it on drop.
pub struct TerminalSink {
    terminal: DefaultTerminal,
}

impl TerminalSink {
    pub fn new() -> Result<Self, SinkError> {
        let terminal = ratatui::try_init()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

impl FrameSink for TerminalSink {
    fn render(&mut self, frame: &DashboardFrame) -> Result<(), SinkError> {
        self.terminal.draw(|f| draw(f, frame))?;
        Ok(())
    }
}

fn draw(f: &mut Frame, frame: &DashboardFrame) {
    let [header, body] =
        Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(f.area());
    draw_header(f, header, &frame.header);
    draw_panels(f, body, &frame.panels);
}

fn draw_header(f: &mut Frame, area: Rect, header: &HeaderView) {
    let [title, tabs, gauge, clock] = Layout::horizontal([
        Constraint::Min(24),
        Constraint::Length(20),
        Constraint::Length(30),
        Constraint::Length(16),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            header.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::bordered()),
        title,
    );

    let selected = LookbackPeriod::TOGGLE
        .iter()
        .position(|period| *period == header.period);
    f.render_widget(
        Tabs::new(LookbackPeriod::TOGGLE.iter().map(|period| period.label()))
            .select(selected)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(Block::bordered().title("Period")),
        tabs,
    );

    f.render_widget(
        Gauge::default()
            .block(Block::bordered().title("Next quote"))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(header.progress.clamp(0.0, 1.0))
            .label(format!("{:.0}%", header.progress * 100.0)),
        gauge,
    );

    f.render_widget(
        Paragraph::new(header.clock.as_str())
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        clock,
    );
}

fn draw_panels(f: &mut Frame, area: Rect, panels: &[PanelView]) {
    if panels.is_empty() {
        return;
    }

    let columns = if area.width >= WIDE_LAYOUT_MIN_WIDTH {
        WIDE_LAYOUT_COLUMNS
    } else {
        2
    }
    .min(panels.len());
    let rows = panels.len().div_ceil(columns);

    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);
    for (row_area, row_panels) in row_areas.iter().zip(panels.chunks(columns)) {
        let cells =
            Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns]).split(*row_area);
        for (cell, panel) in cells.iter().zip(row_panels) {
            draw_panel(f, *cell, panel);
        }
    }
}

fn draw_panel(f: &mut Frame, area: Rect, panel: &PanelView) {
    let mut title = format!(" {} ({}) ", panel.meta.name, panel.meta.symbol);
    if !panel.meta.identifier.is_empty() {
        title = format!(" {} ({}, {}) ", panel.meta.name, panel.meta.symbol, panel.meta.identifier);
    }
    let block = Block::bordered().title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [kpis, chart] =
        Layout::vertical([Constraint::Length(KPI_HEIGHT), Constraint::Min(0)]).areas(inner);

    let mut lines: Vec<Line> = panel.kpis.iter().map(kpi_line).collect();
    if let Some(line) = status_line(&panel.status) {
        lines.push(line);
    }
    f.render_widget(Paragraph::new(lines), kpis);

    if let Some(artifact) = &panel.chart {
        draw_chart(f, chart, artifact);
    }
}

fn kpi_line(kpi: &FormattedKpi) -> Line<'_> {
    let style = match kpi.trend {
        Some(Trend::Up) => Style::default().fg(Color::Green),
        Some(Trend::Down) => Style::default().fg(Color::Red),
        None if !kpi.is_available() => Style::default().fg(Color::DarkGray),
        None => Style::default().add_modifier(Modifier::BOLD),
    };
    Line::from(vec![
        Span::raw(format!("{:<9}", kpi.label)),
        Span::styled(kpi.text.as_str(), style),
    ])
}

fn status_line(status: &InstrumentStatus) -> Option<Line<'static>> {
    let (text, color) = match status {
        InstrumentStatus::Loading => (String::from("loading..."), Color::DarkGray),
        InstrumentStatus::Ready => return None,
        InstrumentStatus::Stale(reason) => (format!("stale: {reason}"), Color::Yellow),
        InstrumentStatus::NoData(reason) => (format!("no data: {reason}"), Color::Red),
    };
    Some(Line::from(Span::styled(text, Style::default().fg(color))))
}

fn draw_chart(f: &mut Frame, area: Rect, artifact: &ChartArtifact) {
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&artifact.points);

    let [x_min, x_max] = artifact.x_bounds;
    let [y_min, y_max] = artifact.y_bounds;
    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels([date_label(x_min), date_label(x_max)])
                .labels_alignment(Alignment::Left)
                .bounds(artifact.x_bounds),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels([format!("{y_min:.2}"), format!("{y_max:.2}")])
                .bounds(artifact.y_bounds),
        );
    f.render_widget(chart, area);
}

fn date_label(unix_secs: f64) -> String {
    UtcDateTime::from_unix_timestamp(unix_secs.round() as i64)
        .ok()
        .and_then(|ts| ts.format_rfc3339().get(..10).map(str::to_owned))
        .unwrap_or_default()
}
