//! Market data contract and request/error types.
//!
//! The dashboard treats every provider as unreliable: a fetch may fail, time
//! out or come back empty, and each outcome is mapped to "no data" for that
//! instrument by the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use tickboard_core::{FetchRange, LookbackPeriod, MarketData, SeriesRequest, Symbol};
//!
//! async fn print_last_close(source: &impl MarketData) -> Result<(), Box<dyn std::error::Error>> {
//!     let request = SeriesRequest::new(
//!         Symbol::parse("EUNL.DE")?,
//!         FetchRange::History(LookbackPeriod::OneYear),
//!     );
//!     let series = source.fetch(request).await?;
//!     if let Some(last) = series.last() {
//!         println!("{}: {:.2}", last.ts, last.close);
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::{LookbackPeriod, PriceSeries, Symbol};

/// Points kept from a latest-quote fetch.
pub const LATEST_POINTS: usize = 2;

/// Window requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchRange {
    /// Short window holding the two most recent closes.
    Latest,
    /// Full lookback window used for chart, ATH, monthly and yearly change.
    History(LookbackPeriod),
}

impl FetchRange {
    /// Range token understood by the chart endpoint. The latest window spans
    /// five days so weekends and holidays still yield two closes.
    pub const fn range_token(self) -> &'static str {
        match self {
            Self::Latest => "5d",
            Self::History(period) => period.range_token(),
        }
    }
}

impl Display for FetchRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::History(period) => write!(f, "history:{period}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: Symbol,
    pub range: FetchRange,
}

impl SeriesRequest {
    pub fn new(symbol: Symbol, range: FetchRange) -> Self {
        Self { symbol, range }
    }

    pub fn latest(symbol: Symbol) -> Self {
        Self::new(symbol, FetchRange::Latest)
    }

    pub fn history(symbol: Symbol, period: LookbackPeriod) -> Self {
        Self::new(symbol, FetchRange::History(period))
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Timeout,
    Empty,
    Internal,
}

/// Structured upstream failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self {
            kind: SourceErrorKind::Timeout,
            message: format!("no response within {} ms", after.as_millis()),
            retryable: true,
        }
    }

    pub fn empty(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::Empty,
            message: format!("no price data returned for '{symbol}'"),
            retryable: true,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::Empty => "source.empty",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Market data provider contract.
///
/// Implementations must be `Send + Sync`; the dashboard fans fetches for
/// different instruments out concurrently.
pub trait MarketData: Send + Sync {
    /// Short provider name used in logs.
    fn id(&self) -> &'static str;

    /// Fetches the close series for one symbol and range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unreachable, rate limits
    /// the call, answers with an unparseable payload, or has no data.
    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

impl<T: MarketData + ?Sized> MarketData for std::sync::Arc<T> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        (**self).fetch(req)
    }
}
