//! # Refresh Scheduler
//!
//! Time-based cache invalidation for the two data classes of the dashboard.
//!
//! | Cache | Default interval | Refetches |
//! |-------|------------------|-----------|
//! | quote | 45 s | 2-point latest series, daily change |
//! | history | 30 min | full lookback window, chart, ATH, monthly, yearly |
//!
//! Each cache runs the state machine `Fresh → Due → (fetch attempted) → Fresh`.
//! The attempt resets the timer whether or not the fetch succeeded, which
//! spaces out retries against a failing upstream.

mod clock;
mod ticker;

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use serde::Serialize;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::{IntervalTicker, Ticker};

pub const DEFAULT_QUOTE_INTERVAL: Duration = Duration::from_secs(45);
pub const DEFAULT_HISTORY_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    Quote,
    History,
}

impl CacheKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::History => "history",
        }
    }
}

impl Display for CacheKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Fresh,
    Due,
}

/// Lifetime of one cached data class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTimer {
    interval: Duration,
    last_fetch: Option<Instant>,
}

impl CacheTimer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fetch: None,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub const fn last_fetch(&self) -> Option<Instant> {
        self.last_fetch
    }

    pub fn state(&self, now: Instant) -> CacheState {
        match self.last_fetch {
            None => CacheState::Due,
            Some(last) if now.saturating_duration_since(last) >= self.interval => CacheState::Due,
            Some(_) => CacheState::Fresh,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.state(now) == CacheState::Due
    }

    /// Records a fetch attempt, successful or not.
    pub fn mark_fetched(&mut self, now: Instant) {
        self.last_fetch = Some(now);
    }

    /// Forces the next check to report `Due`.
    pub fn invalidate(&mut self) {
        self.last_fetch = None;
    }

    /// Elapsed fraction of the interval, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        let Some(last) = self.last_fetch else {
            return 1.0;
        };
        if self.interval.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        (elapsed / self.interval.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Caches due on a given tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueSet {
    pub quote: bool,
    pub history: bool,
}

impl DueSet {
    pub const fn any(self) -> bool {
        self.quote || self.history
    }
}

/// Explicitly owned refresh bookkeeping for both caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshState {
    quote: CacheTimer,
    history: CacheTimer,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_INTERVAL, DEFAULT_HISTORY_INTERVAL)
    }
}

impl RefreshState {
    pub const fn new(quote_interval: Duration, history_interval: Duration) -> Self {
        Self {
            quote: CacheTimer::new(quote_interval),
            history: CacheTimer::new(history_interval),
        }
    }

    pub const fn timer(&self, kind: CacheKind) -> &CacheTimer {
        match kind {
            CacheKind::Quote => &self.quote,
            CacheKind::History => &self.history,
        }
    }

    fn timer_mut(&mut self, kind: CacheKind) -> &mut CacheTimer {
        match kind {
            CacheKind::Quote => &mut self.quote,
            CacheKind::History => &mut self.history,
        }
    }

    pub fn due(&self, now: Instant) -> DueSet {
        DueSet {
            quote: self.quote.is_due(now),
            history: self.history.is_due(now),
        }
    }

    pub fn record(&mut self, kind: CacheKind, now: Instant) {
        self.timer_mut(kind).mark_fetched(now);
    }

    pub fn invalidate(&mut self, kind: CacheKind) {
        self.timer_mut(kind).invalidate();
    }

    /// Countdown fraction of the quote cache, for the header progress bar.
    pub fn progress(&self, now: Instant) -> f64 {
        self.quote.progress(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_fetched_cache_is_due() {
        let timer = CacheTimer::new(Duration::from_secs(45));
        let now = Instant::now();
        assert_eq!(timer.state(now), CacheState::Due);
        assert_eq!(timer.progress(now), 1.0);
    }

    #[test]
    fn becomes_due_exactly_at_interval() {
        let start = Instant::now();
        let mut timer = CacheTimer::new(Duration::from_secs(45));
        timer.mark_fetched(start);

        assert_eq!(timer.state(start + Duration::from_secs(44)), CacheState::Fresh);
        assert_eq!(timer.state(start + Duration::from_secs(45)), CacheState::Due);
    }

    #[test]
    fn progress_is_clamped_and_resets() {
        let start = Instant::now();
        let mut timer = CacheTimer::new(Duration::from_secs(40));
        timer.mark_fetched(start);

        assert_eq!(timer.progress(start), 0.0);
        assert_eq!(timer.progress(start + Duration::from_secs(10)), 0.25);
        assert_eq!(timer.progress(start + Duration::from_secs(400)), 1.0);

        let later = start + Duration::from_secs(400);
        timer.mark_fetched(later);
        assert_eq!(timer.progress(later), 0.0);
    }

    #[test]
    fn invalidate_forces_due() {
        let now = Instant::now();
        let mut state = RefreshState::default();
        state.record(CacheKind::Quote, now);
        state.record(CacheKind::History, now);
        assert!(!state.due(now).any());

        state.invalidate(CacheKind::History);
        assert_eq!(
            state.due(now),
            DueSet {
                quote: false,
                history: true
            }
        );
    }
}
