use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::UtcDateTime;

/// Time source for the scheduler.
pub trait Clock: Send + Sync {
    /// Monotonic time used for cache ages.
    fn now(&self) -> Instant;

    /// Wall-clock time shown in the header.
    fn wall_clock(&self) -> UtcDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_clock(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

#[derive(Debug)]
struct ManualInner {
    elapsed: Duration,
    wall_start: UtcDateTime,
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle while the
/// dashboard owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualClock {
    pub fn new(wall_start: UtcDateTime) -> Self {
        Self {
            origin: Instant::now(),
            inner: Arc::new(Mutex::new(ManualInner {
                elapsed: Duration::ZERO,
                wall_start,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock().expect("manual clock lock is not poisoned");
        inner.elapsed += by;
    }

    pub fn elapsed(&self) -> Duration {
        self.inner
            .lock()
            .expect("manual clock lock is not poisoned")
            .elapsed
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(UtcDateTime::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn wall_clock(&self) -> UtcDateTime {
        let inner = self.inner.lock().expect("manual clock lock is not poisoned");
        let wall = inner.wall_start.into_inner() + inner.elapsed;
        UtcDateTime::from_offset_datetime(wall).unwrap_or(inner.wall_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_both_times_together() {
        let start = UtcDateTime::parse("2024-01-01T12:00:00Z").expect("timestamp");
        let clock = ManualClock::new(start);
        let before = clock.now();

        let handle = clock.clone();
        handle.advance(Duration::from_secs(90));

        assert_eq!(clock.now() - before, Duration::from_secs(90));
        assert_eq!(clock.wall_clock().format_rfc3339(), "2024-01-01T12:01:30Z");
    }
}
