//! # Dashboard service
//!
//! Owns the instrument states and the [`RefreshState`], drives fetches on
//! each tick and turns the result into a [`DashboardFrame`] for a
//! [`FrameSink`].
//!
//! ```text
//! ticker ──▶ tick() ──▶ due? ──▶ join_all(fetch + timeout) ──▶ snapshots
//!                                                                 │
//! stop / controls ◀── wait ◀── sink.render(frame()) ◀────────────┘
//! ```
//!
//! Upstream failures never escape a tick: they become a per-instrument
//! status and a `warn!` line.

mod frame;

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::chart::ChartArtifact;
use crate::config::ValidatedConfig;
use crate::data_source::{MarketData, SeriesRequest, SourceError};
use crate::kpi::format::format_snapshot;
use crate::kpi::{compute_snapshot, KpiSnapshot};
use crate::refresh::{CacheKind, Clock, RefreshState, Ticker};
use crate::{InstrumentMeta, LookbackPeriod, PriceSeries};

pub use frame::{DashboardFrame, FrameSink, HeaderView, InstrumentStatus, PanelView, SinkError};

/// User intent delivered to a running loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardControl {
    /// Refetch both caches on the next tick.
    Refresh,
    SelectPeriod(LookbackPeriod),
}

/// Cached data and derived values for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentState {
    pub meta: InstrumentMeta,
    pub history: PriceSeries,
    pub latest: Option<PriceSeries>,
    pub snapshot: Option<KpiSnapshot>,
    pub chart: Option<ChartArtifact>,
    pub status: InstrumentStatus,
    history_error: Option<String>,
    quote_error: Option<String>,
}

impl InstrumentState {
    pub fn new(meta: InstrumentMeta) -> Self {
        Self {
            meta,
            history: PriceSeries::empty(),
            latest: None,
            snapshot: None,
            chart: None,
            status: InstrumentStatus::Loading,
            history_error: None,
            quote_error: None,
        }
    }

    fn apply_history(&mut self, result: Result<PriceSeries, SourceError>) {
        match result {
            Ok(series) => {
                self.chart = ChartArtifact::from_series(&series);
                self.history = series;
                self.history_error = None;
            }
            Err(err) => {
                self.history = PriceSeries::empty();
                self.chart = None;
                self.history_error = Some(err.to_string());
            }
        }
    }

    fn apply_quote(&mut self, result: Result<PriceSeries, SourceError>) {
        match result {
            Ok(series) => {
                self.latest = Some(series);
                self.quote_error = None;
            }
            Err(err) => {
                self.latest = None;
                self.quote_error = Some(err.to_string());
            }
        }
    }

    fn recompute(&mut self) {
        self.snapshot = compute_snapshot(&self.history, self.latest.as_ref());
        self.status = match (&self.snapshot, &self.history_error, &self.quote_error) {
            (None, Some(reason), _) => InstrumentStatus::NoData(reason.clone()),
            (None, None, _) => InstrumentStatus::NoData(String::from("not enough price history")),
            (Some(_), _, Some(reason)) => InstrumentStatus::Stale(reason.clone()),
            (Some(_), _, None) => InstrumentStatus::Ready,
        };
    }

    fn panel(&self) -> PanelView {
        PanelView {
            meta: self.meta.clone(),
            kpis: format_snapshot(self.snapshot.as_ref()),
            snapshot: self.snapshot.clone(),
            chart: self.chart.clone(),
            status: self.status.clone(),
        }
    }
}

/// One failed fetch within a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub symbol: String,
    pub cache: CacheKind,
    pub error: SourceError,
}

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub quote_fetched: bool,
    pub history_fetched: bool,
    pub failures: Vec<FetchFailure>,
}

impl TickReport {
    pub fn fetched_any(&self) -> bool {
        self.quote_fetched || self.history_fetched
    }
}

pub struct Dashboard<S, C> {
    source: S,
    clock: C,
    title: String,
    period: LookbackPeriod,
    fetch_timeout: Duration,
    refresh: RefreshState,
    instruments: Vec<InstrumentState>,
}

impl<S: MarketData, C: Clock> Dashboard<S, C> {
    pub fn new(config: &ValidatedConfig, source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            title: config.title.clone(),
            period: config.lookback,
            fetch_timeout: config.fetch_timeout,
            refresh: RefreshState::new(config.quote_interval, config.history_interval),
            instruments: config
                .instruments
                .iter()
                .cloned()
                .map(InstrumentState::new)
                .collect(),
        }
    }

    pub fn instruments(&self) -> &[InstrumentState] {
        &self.instruments
    }

    pub fn period(&self) -> LookbackPeriod {
        self.period
    }

    pub fn refresh_state(&self) -> &RefreshState {
        &self.refresh
    }

    /// Changes the lookback window; the history cache is refetched on the
    /// next tick.
    pub fn set_period(&mut self, period: LookbackPeriod) {
        if period == self.period {
            return;
        }
        info!(from = %self.period, to = %period, "lookback period changed");
        self.period = period;
        self.refresh.invalidate(CacheKind::History);
    }

    pub fn request_refresh(&mut self) {
        debug!("manual refresh requested");
        self.refresh.invalidate(CacheKind::Quote);
        self.refresh.invalidate(CacheKind::History);
    }

    pub fn apply(&mut self, control: DashboardControl) {
        match control {
            DashboardControl::Refresh => self.request_refresh(),
            DashboardControl::SelectPeriod(period) => self.set_period(period),
        }
    }

    /// Fetches whatever is due and recomputes snapshots.
    ///
    /// The tick's `now` is read once; each attempted cache is recorded with
    /// it whether or not the fetches succeeded.
    pub async fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let due = self.refresh.due(now);
        let mut report = TickReport::default();

        if due.history {
            let period = self.period;
            let results = self
                .fetch_all(|state| SeriesRequest::history(state.meta.symbol.clone(), period))
                .await;
            self.refresh.record(CacheKind::History, now);
            report.history_fetched = true;
            for (state, result) in self.instruments.iter_mut().zip(results) {
                if let Err(err) = &result {
                    report.failures.push(failure(state, CacheKind::History, err));
                }
                state.apply_history(result);
            }
        }

        if due.quote {
            let results = self
                .fetch_all(|state| SeriesRequest::latest(state.meta.symbol.clone()))
                .await;
            self.refresh.record(CacheKind::Quote, now);
            report.quote_fetched = true;
            for (state, result) in self.instruments.iter_mut().zip(results) {
                if let Err(err) = &result {
                    report.failures.push(failure(state, CacheKind::Quote, err));
                }
                state.apply_quote(result);
            }
        }

        if report.fetched_any() {
            for state in &mut self.instruments {
                state.recompute();
            }
            info!(
                source = self.source.id(),
                quote = report.quote_fetched,
                history = report.history_fetched,
                failures = report.failures.len(),
                "dashboard refreshed"
            );
        }

        report
    }

    pub fn frame(&self) -> DashboardFrame {
        DashboardFrame {
            header: HeaderView {
                title: self.title.clone(),
                period: self.period,
                progress: self.refresh.progress(self.clock.now()),
                clock: self.clock.wall_clock().format_clock(),
            },
            panels: self.instruments.iter().map(InstrumentState::panel).collect(),
        }
    }

    /// Runs the poll loop until `stop` turns true or its sender is dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`SinkError`]; the loop stops there.
    pub async fn run<T, K>(
        &mut self,
        ticker: &mut T,
        sink: &mut K,
        stop: watch::Receiver<bool>,
    ) -> Result<(), SinkError>
    where
        T: Ticker,
        K: FrameSink,
    {
        let (_controls_tx, controls_rx) = mpsc::unbounded_channel();
        self.run_with_controls(ticker, sink, stop, controls_rx).await
    }

    /// Like [`Dashboard::run`], additionally applying controls as they
    /// arrive. A control triggers an immediate tick and redraw.
    ///
    /// Stop and controls are only observed while waiting; a tick in progress
    /// always completes.
    pub async fn run_with_controls<T, K>(
        &mut self,
        ticker: &mut T,
        sink: &mut K,
        mut stop: watch::Receiver<bool>,
        mut controls: mpsc::UnboundedReceiver<DashboardControl>,
    ) -> Result<(), SinkError>
    where
        T: Ticker,
        K: FrameSink,
    {
        info!(
            source = self.source.id(),
            instruments = self.instruments.len(),
            period = %self.period,
            "dashboard loop started"
        );
        let mut controls_open = true;

        loop {
            if *stop.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow_and_update() {
                        break;
                    }
                    continue;
                }
                control = controls.recv(), if controls_open => match control {
                    Some(control) => self.apply(control),
                    None => {
                        controls_open = false;
                        continue;
                    }
                },
            }

            let report = self.tick().await;
            debug!(
                quote = report.quote_fetched,
                history = report.history_fetched,
                "tick complete"
            );
            sink.render(&self.frame())?;
        }

        info!("dashboard loop stopped");
        Ok(())
    }

    async fn fetch_all<F>(&self, request_for: F) -> Vec<Result<PriceSeries, SourceError>>
    where
        F: Fn(&InstrumentState) -> SeriesRequest,
    {
        let fetches = self
            .instruments
            .iter()
            .map(|state| fetch_with_timeout(&self.source, request_for(state), self.fetch_timeout));
        join_all(fetches).await
    }
}

/// A fetch that errors, exceeds `timeout` or returns no points is a failure.
async fn fetch_with_timeout<S: MarketData>(
    source: &S,
    req: SeriesRequest,
    timeout: Duration,
) -> Result<PriceSeries, SourceError> {
    let symbol = req.symbol.clone();
    let range = req.range;
    debug!(symbol = %symbol, range = %range, "fetching");

    let result = match tokio::time::timeout(timeout, source.fetch(req)).await {
        Ok(Ok(series)) if series.is_empty() => Err(SourceError::empty(&symbol)),
        Ok(result) => result,
        Err(_) => Err(SourceError::timeout(timeout)),
    };

    if let Err(err) = &result {
        warn!(symbol = %symbol, range = %range, code = err.code(), error = %err, "fetch failed");
    }
    result
}

fn failure(state: &InstrumentState, cache: CacheKind, err: &SourceError) -> FetchFailure {
    FetchFailure {
        symbol: state.meta.symbol.to_string(),
        cache,
        error: err.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricePoint, Symbol, UtcDateTime};

    fn meta() -> InstrumentMeta {
        InstrumentMeta::new(Symbol::parse("EUNL.DE").expect("symbol"), "World", "")
            .expect("meta")
    }

    fn series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let ts = UtcDateTime::from_unix_timestamp(1_700_000_000 + i as i64 * 86_400)
                    .expect("ts");
                PricePoint::new(ts, *close).expect("point")
            })
            .collect();
        PriceSeries::new(points).expect("series")
    }

    #[test]
    fn failed_history_means_no_data() {
        let mut state = InstrumentState::new(meta());
        state.apply_history(Ok(series(&[100.0, 102.0])));
        state.recompute();
        assert_eq!(state.status, InstrumentStatus::Ready);

        state.apply_history(Err(SourceError::unavailable("down")));
        state.recompute();
        assert!(state.snapshot.is_none());
        assert!(state.chart.is_none());
        assert!(matches!(state.status, InstrumentStatus::NoData(_)));
    }

    #[test]
    fn failed_quote_keeps_history_snapshot() {
        let mut state = InstrumentState::new(meta());
        state.apply_history(Ok(series(&[100.0, 102.0, 98.0, 105.0])));
        state.apply_quote(Err(SourceError::rate_limited("slow down")));
        state.recompute();

        let snapshot = state.snapshot.as_ref().expect("snapshot");
        assert_eq!(snapshot.current, 105.0);
        assert_eq!(
            state.status.reason(),
            Some("slow down (source.rate_limited)")
        );
    }

    #[test]
    fn short_history_reports_reason() {
        let mut state = InstrumentState::new(meta());
        state.apply_history(Ok(series(&[100.0])));
        state.recompute();
        assert_eq!(
            state.status,
            InstrumentStatus::NoData(String::from("not enough price history"))
        );
    }
}
