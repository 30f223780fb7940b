//! # KPI Engine
//!
//! Pure functions turning price series into a [`KpiSnapshot`].
//!
//! | Metric | Formula | Absent when |
//! |--------|---------|-------------|
//! | current | last close of the latest series, else of history | never (snapshot absent instead) |
//! | all-time high | max close over the history window | never |
//! | daily % | `(last − previous) / previous × 100` | < 2 points, zero previous |
//! | monthly % | `(current − history[len − 22]) / history[len − 22] × 100` | < 22 history points |
//! | yearly % | `(current − history[0]) / history[0] × 100` | zero base |
//! | Δ ATH % | `(current − ATH) / ATH × 100` | zero ATH |
//!
//! A snapshot needs at least two history points; otherwise
//! [`compute_snapshot`] returns `None`. Nothing here returns an error.

pub mod format;

use serde::{Deserialize, Serialize};

use crate::{PricePoint, PriceSeries};

/// Minimum history length for any snapshot.
pub const MIN_SNAPSHOT_POINTS: usize = 2;

/// Observations approximating one trading month.
pub const MONTHLY_LOOKBACK: usize = 22;

/// Series that supplied the snapshot's current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentSource {
    History,
    Latest,
}

/// Performance metrics for one instrument at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub current: f64,
    pub all_time_high: f64,
    pub daily_pct: Option<f64>,
    pub monthly_pct: Option<f64>,
    pub yearly_pct: Option<f64>,
    pub delta_from_ath_pct: Option<f64>,
    pub current_source: CurrentSource,
}

/// Percentage change from `from` to `to`.
///
/// `None` for a zero or non-finite base, or a non-finite result.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }
    let pct = (to - from) / from * 100.0;
    pct.is_finite().then_some(pct)
}

/// Computes a snapshot from the history window and an optional short
/// "latest" series.
///
/// The latest series, when present and non-empty, is the source of truth for
/// the current price.
pub fn compute_snapshot(history: &PriceSeries, latest: Option<&PriceSeries>) -> Option<KpiSnapshot> {
    if history.len() < MIN_SNAPSHOT_POINTS {
        return None;
    }

    let history_last = history.last()?;
    let window_start = history.first()?;
    let history_high = history.max_close()?;

    let latest_last = latest.and_then(|series| series.last().map(|last| (series, last)));
    let (current_point, current_source, previous) = match latest_last {
        Some((series, last)) => {
            let previous = series
                .nth_back(1)
                .or_else(|| history.last_before(last.ts))
                .map(|point| point.close);
            (*last, CurrentSource::Latest, previous)
        }
        None => (
            *history_last,
            CurrentSource::History,
            history.nth_back(1).map(|point| point.close),
        ),
    };

    let current = current_point.close;
    let all_time_high = match current_source {
        CurrentSource::History => history_high,
        CurrentSource::Latest => history_high.max(current),
    };

    Some(KpiSnapshot {
        current,
        all_time_high,
        daily_pct: previous.and_then(|previous| pct_change(previous, current)),
        monthly_pct: monthly_base(history).and_then(|base| pct_change(base.close, current)),
        yearly_pct: pct_change(window_start.close, current),
        delta_from_ath_pct: pct_change(all_time_high, current),
        current_source,
    })
}

fn monthly_base(history: &PriceSeries) -> Option<&PricePoint> {
    if history.len() < MONTHLY_LOOKBACK {
        return None;
    }
    history.nth_back(MONTHLY_LOOKBACK - 1)
}
