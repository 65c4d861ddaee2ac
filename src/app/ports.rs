//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (clock, armed line, keypad, relays, coils, display,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the cycle logic never touches hardware directly and tests can run
//! it against a fake clock and recording mocks.

use crate::display::Frame;
use crate::drivers::status_led::StatusLights;
use crate::drivers::stepper::CoilPattern;
use crate::timing::{Micros, Millis};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  The only timing primitive in the system.
///
/// Readings are non-decreasing until they wrap; callers only ever take
/// wrapping deltas (see [`crate::timing`]).
pub trait Clock {
    fn now_ms(&self) -> Millis;
    fn now_us(&self) -> Micros;
}

// ───────────────────────────────────────────────────────────────
// Arming port (access gate → domain)
// ───────────────────────────────────────────────────────────────

/// The access gate's single output.  Sampled once per tick.
pub trait ArmingPort {
    fn is_armed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Input port (keypad → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, undebounced key levels.
pub trait InputPort {
    /// Instantaneous level of the START/CANCEL key (`true` = held down).
    fn start_key_raw(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → relays / coils / indicators)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
/// Implementations handle output polarity; `true` always means "on".
pub trait ActuatorPort {
    /// Open (`true`) or close the inlet valve.
    fn set_inlet(&mut self, open: bool);

    /// Open (`true`) or close the drain valve.
    fn set_drain(&mut self, open: bool);

    /// Drive the four stepper coil lines.
    fn set_coils(&mut self, pattern: CoilPattern);

    /// Update the status indicators and the enable line.
    fn set_status(&mut self, lights: StatusLights);

    /// Close both valves and de-energise every coil, in one call.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → character display)
// ───────────────────────────────────────────────────────────────

/// Paints four lines of text.  The domain throttles calls.
pub trait DisplayPort {
    fn render(&mut self, frame: &Frame);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
