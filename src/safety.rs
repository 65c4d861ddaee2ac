//! Access gate.
//!
//! The gate runs **every tick before anything else** and tracks the single
//! "armed" boolean produced by the external access-control logic.  While
//! the gate is locked the service forces every output off and holds the
//! cycle in `Idle`; nothing else runs that tick.
//!
//! ## Lifecycle
//!
//! 1. Power-on: locked until the first armed sample.
//! 2. `observe(true)` on a locked gate reports [`GateEvent::Released`]; the
//!    service resumes from `Idle` exactly as at cold start.
//! 3. `observe(false)` on an armed gate reports [`GateEvent::Engaged`]; the
//!    service quiesces in the same tick.
//!
//! Only edges are reported, so the caller can run one-shot actions (the
//! "locked" notice, the re-arm reset) without its own bookkeeping.

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// Armed → locked.
    Engaged,
    /// Locked → armed.
    Released,
}

#[derive(Debug, Default)]
pub struct SafetyGate {
    armed: bool,
    /// Locked → armed transitions since boot.
    releases: u32,
}

impl SafetyGate {
    /// Starts locked.
    pub const fn new() -> Self {
        Self {
            armed: false,
            releases: 0,
        }
    }

    /// Feed this tick's armed sample.  Returns the edge, if any.
    pub fn observe(&mut self, armed: bool) -> Option<GateEvent> {
        if armed == self.armed {
            return None;
        }
        self.armed = armed;
        if armed {
            self.releases = self.releases.wrapping_add(1);
            info!("GATE: armed, controls unlocked");
            Some(GateEvent::Released)
        } else {
            warn!("GATE: disarmed, forcing all outputs off");
            Some(GateEvent::Engaged)
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn releases(&self) -> u32 {
        self.releases
    }
}
