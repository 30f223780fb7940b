use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use crate::data_source::{FetchRange, MarketData, SeriesRequest, SourceError, LATEST_POINTS};
use crate::{PricePoint, PriceSeries, Symbol, UtcDateTime};

const DAY_SECS: i64 = 86_400;
const LATEST_WINDOW_DAYS: usize = 5;

/// Deterministic offline price generator seeded by symbol.
///
/// Without an anchor the series ends today and the latest close drifts with
/// the wall clock, so an offline dashboard still shows movement.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    anchor: Option<UtcDateTime>,
    failing: HashSet<Symbol>,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the last generated point to `anchor`.
    pub fn with_anchor(mut self, anchor: UtcDateTime) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Makes every fetch for `symbol` fail as unavailable.
    pub fn with_failing_symbol(mut self, symbol: Symbol) -> Self {
        self.failing.insert(symbol);
        self
    }

    fn generate(&self, req: &SeriesRequest) -> Result<PriceSeries, SourceError> {
        if self.failing.contains(&req.symbol) {
            return Err(SourceError::unavailable(format!(
                "synthetic source configured to fail '{}'",
                req.symbol
            )));
        }

        let (anchor, drift) = match self.anchor {
            Some(anchor) => (anchor.unix_timestamp(), 0.0),
            None => {
                let now = UtcDateTime::now().unix_timestamp();
                let minute = (now / 60) % 60;
                (now - now % DAY_SECS, (minute as f64 / 60.0 - 0.5) * 0.01)
            }
        };

        let seed = symbol_seed(&req.symbol);
        let count = match req.range {
            FetchRange::Latest => LATEST_WINDOW_DAYS,
            FetchRange::History(period) => period.trading_days(),
        };

        let mut points = Vec::with_capacity(count);
        for offset in (0..count).rev() {
            let ts = UtcDateTime::from_unix_timestamp(anchor - offset as i64 * DAY_SECS)
                .map_err(|e| SourceError::internal(e.to_string()))?;
            let mut close = synthetic_close(seed, day_index(ts));
            if offset == 0 {
                close *= 1.0 + drift;
            }
            let point =
                PricePoint::new(ts, close).map_err(|e| SourceError::internal(e.to_string()))?;
            points.push(point);
        }

        let series = PriceSeries::new(points).map_err(|e| SourceError::internal(e.to_string()))?;
        Ok(match req.range {
            FetchRange::Latest => series.tail(LATEST_POINTS),
            FetchRange::History(_) => series,
        })
    }
}

impl MarketData for SyntheticSource {
    fn id(&self) -> &'static str {
        "synthetic"
    }

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.generate(&req) })
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(17_u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64))
}

fn day_index(ts: UtcDateTime) -> f64 {
    (ts.unix_timestamp() / DAY_SECS) as f64
}

// Same calendar day always yields the same close, so history and latest agree.
fn synthetic_close(seed: u64, day: f64) -> f64 {
    let base = 50.0 + (seed % 150) as f64;
    let phase = (seed % 628) as f64 / 100.0;
    let wave = 0.12 * (day / 23.0 + phase).sin() + 0.04 * (day / 5.0 + phase).cos();
    base * (1.0 + wave)
}
