//! # Tickboard Core
//!
//! KPI engine, refresh scheduler and market data contracts behind the
//! tickboard ETF & ETC dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo chart API and offline synthetic provider |
//! | [`chart`] | Renderer-neutral line chart artifact |
//! | [`config`] | JSON configuration and validation |
//! | [`dashboard`] | Poll loop, instrument state and render frames |
//! | [`data_source`] | Market data trait and request/error types |
//! | [`domain`] | Symbols, timestamps, price series, lookback periods |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport seam |
//! | [`kpi`] | Snapshot computation and display formatting |
//! | [`refresh`] | Cache timers, clocks and tickers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickboard_core::{compute_snapshot, PriceSeries};
//!
//! fn describe(history: &PriceSeries) {
//!     match compute_snapshot(history, None) {
//!         Some(kpi) => println!("current {:.2}, ATH {:.2}", kpi.current, kpi.all_time_high),
//!         None => println!("no data"),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Dashboard      │────▶│ RefreshState     │
//! │  (poll loop)    │     │ (quote/history)  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ HttpClient       │
//! │ (Yahoo/offline) │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ KPI Engine      │────▶│ FrameSink        │
//! │ + ChartArtifact │     │ (terminal, JSON) │
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod kpi;
pub mod refresh;

pub use adapters::{parse_chart_response, SyntheticSource, YahooChartSource};
pub use chart::ChartArtifact;
pub use config::{ConfigError, DashboardConfig, InstrumentConfig, ValidatedConfig};
pub use dashboard::{
    Dashboard, DashboardControl, DashboardFrame, FetchFailure, FrameSink, HeaderView,
    InstrumentState, InstrumentStatus, PanelView, SinkError, TickReport,
};
pub use data_source::{FetchRange, MarketData, SeriesRequest, SourceError, SourceErrorKind};
pub use domain::{InstrumentMeta, LookbackPeriod, PricePoint, PriceSeries, Symbol, UtcDateTime};
pub use error::ValidationError;
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use kpi::format::{format_percent, format_price, format_snapshot, FormattedKpi, Trend};
pub use kpi::{compute_snapshot, pct_change, CurrentSource, KpiSnapshot};
pub use refresh::{
    CacheKind, CacheState, CacheTimer, Clock, DueSet, IntervalTicker, ManualClock, RefreshState,
    SystemClock, Ticker,
};
