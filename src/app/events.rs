//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use serde::Serialize;

use crate::drivers::stepper::StepperMode;
use crate::fsm::Stage;
use crate::timing::Millis;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial stage).
    Started(Stage),

    /// The cycle moved between stages.
    StageChanged { from: Stage, to: Stage },

    /// A debounced START/CANCEL press was delivered while in `stage`.
    StartCancel { stage: Stage },

    /// The access gate locked; outputs forced off, cycle reset.
    Locked { from: Stage },

    /// The access gate released; the cycle resumes from Idle.
    Armed,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// Point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryData {
    pub stage: Stage,
    pub ms_in_stage: Millis,
    pub inlet_open: bool,
    pub drain_open: bool,
    pub stepper: StepperMode,
    pub phase: u8,
    pub armed: bool,
    /// Presses dropped because the previous one was still pending.
    pub dropped_presses: u32,
}
