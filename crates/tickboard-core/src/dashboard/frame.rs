use serde::Serialize;
use thiserror::Error;

use crate::chart::ChartArtifact;
use crate::kpi::format::FormattedKpi;
use crate::kpi::KpiSnapshot;
use crate::{InstrumentMeta, LookbackPeriod};

/// Per-instrument display status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum InstrumentStatus {
    /// No fetch attempted yet.
    Loading,
    Ready,
    /// Snapshot available but the latest quote could not be refreshed.
    Stale(String),
    /// Nothing to show; the reason is displayed in place of the KPIs.
    NoData(String),
}

impl InstrumentStatus {
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Stale(reason) | Self::NoData(reason) => Some(reason),
            Self::Loading | Self::Ready => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub title: String,
    pub period: LookbackPeriod,
    /// Quote refresh countdown in `[0, 1]`.
    pub progress: f64,
    /// Wall clock as `HH:MM:SS UTC`.
    pub clock: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub meta: InstrumentMeta,
    pub kpis: Vec<FormattedKpi>,
    pub snapshot: Option<KpiSnapshot>,
    pub chart: Option<ChartArtifact>,
    pub status: InstrumentStatus,
}

/// Everything a renderer needs for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFrame {
    pub header: HeaderView,
    pub panels: Vec<PanelView>,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("render target I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame encoding failed: {0}")]
    Encode(String),
    #[error("render target closed: {0}")]
    Closed(String),
}

/// Write-only render boundary driven by the dashboard loop.
pub trait FrameSink: Send {
    fn render(&mut self, frame: &DashboardFrame) -> Result<(), SinkError>;
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    fn render(&mut self, frame: &DashboardFrame) -> Result<(), SinkError> {
        (**self).render(frame)
    }
}
