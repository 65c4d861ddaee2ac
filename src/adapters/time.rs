//! Monotonic clock adapter.
//!
//! - **`espidf`**: wraps `esp_timer_get_time()` from the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic).
//! - **host**: uses `std::time::Instant` for simulation.
//!
//! Both truncate to the domain's wrapping `u32` counters.

use crate::app::ports::Clock;
use crate::timing::{Micros, Millis};

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot, 64-bit.
    #[cfg(feature = "espidf")]
    fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time() takes no arguments, has no
        // preconditions and is callable from any task once IDF has booted.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction, 64-bit.
    #[cfg(not(feature = "espidf"))]
    fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Millis {
        (self.uptime_us() / 1_000) as Millis
    }

    fn now_us(&self) -> Micros {
        self.uptime_us() as Micros
    }
}
