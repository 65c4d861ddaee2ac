//! Debounced edge detector for the START / CANCEL key.
//!
//! ## Sampling
//!
//! No interrupts: the main loop scans the key matrix every tick and feeds
//! the raw level in through [`DebouncedButton::update`].  A level change
//! restarts the debounce timer; once the raw level has been steady for the
//! debounce window (150 ms by default) it becomes the new stable level.
//!
//! ## One-shot press event
//!
//! A stable released → pressed transition raises a single pending event.
//! [`DebouncedButton::take_press`] reads and clears it in one step, so a
//! physical press yields exactly one logical event no matter how many
//! ticks pass before it is consumed, or how long the key is held.
//!
//! There is no queue: a second press arriving while the first event is
//! still pending is dropped.

use log::debug;

use crate::timing::{Millis, elapsed};

/// Debounce + one-shot state for a single key.
#[derive(Debug, Clone)]
pub struct DebouncedButton {
    debounce_ms: Millis,
    raw_level: bool,
    last_change_at: Millis,
    stable_level: bool,
    pending: bool,
    dropped: u32,
}

impl DebouncedButton {
    pub fn new(debounce_ms: Millis) -> Self {
        Self {
            debounce_ms,
            raw_level: false,
            last_change_at: 0,
            stable_level: false,
            pending: false,
            dropped: 0,
        }
    }

    /// Feed one raw sample (`true` = key held down).  Call every tick.
    pub fn update(&mut self, raw: bool, now_ms: Millis) {
        if raw != self.raw_level {
            self.raw_level = raw;
            self.last_change_at = now_ms;
            return;
        }

        if raw == self.stable_level || elapsed(now_ms, self.last_change_at) < self.debounce_ms {
            return;
        }

        self.stable_level = raw;
        if raw {
            if self.pending {
                self.dropped = self.dropped.wrapping_add(1);
                debug!("button: press dropped, previous event not yet consumed");
            } else {
                self.pending = true;
                debug!("button: press at {}ms", now_ms);
            }
        }
    }

    /// Read-and-clear the one-shot press event.
    pub fn take_press(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }

    /// Whether a press is waiting to be consumed (does not clear it).
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Debounced level.
    pub fn is_held(&self) -> bool {
        self.stable_level
    }

    /// Presses discarded because an earlier event was still pending.
    pub fn dropped_presses(&self) -> u32 {
        self.dropped
    }

    /// Back to power-on state, as if the key had never been touched.
    ///
    /// `now_ms` seeds the debounce timer so a key already held down must
    /// still be released before it can fire.
    pub fn reset(&mut self, raw: bool, now_ms: Millis) {
        self.raw_level = raw;
        self.stable_level = raw;
        self.last_change_at = now_ms;
        self.pending = false;
    }
}
