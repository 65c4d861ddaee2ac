//! Wrap-tolerant timing helpers.
//!
//! Every duration in the controller is a delta between two readings of
//! the monotonic clock.  Counters are `u32` and wrap (~49.7 days for
//! milliseconds, ~71.6 minutes for microseconds); deltas are computed
//! with `wrapping_sub`, so a single wrap between `start` and `now` still
//! yields the correct elapsed time.

/// Milliseconds since boot, wrapping at `u32::MAX`.
pub type Millis = u32;

/// Microseconds since boot, wrapping at `u32::MAX`.
pub type Micros = u32;

/// Elapsed time between `start` and `now`, tolerant of one wrap.
#[inline]
pub const fn elapsed(now: u32, start: u32) -> u32 {
    now.wrapping_sub(start)
}

/// `true` once at least `budget` has passed since `start` (inclusive).
#[inline]
pub const fn has_elapsed(now: u32, start: u32, budget: u32) -> bool {
    elapsed(now, start) >= budget
}

/// Non-blocking periodic trigger.
///
/// `due()` returns `true` at most once per `interval_ms`; the first call
/// fires immediately.
#[derive(Debug, Clone, Copy)]
pub struct Periodic {
    interval_ms: Millis,
    last: Option<Millis>,
}

impl Periodic {
    pub const fn new(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    pub fn due(&mut self, now: Millis) -> bool {
        match self.last {
            Some(last) if !has_elapsed(now, last, self.interval_ms) => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last firing so the next `due()` fires immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
