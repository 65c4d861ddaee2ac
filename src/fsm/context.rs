//! Shared mutable context threaded through every stage handler.
//!
//! `FsmContext` is the single struct that stage handlers read from and
//! write to: the current time, the per-stage bookkeeping, the actuator
//! intent they want applied, the cycle configuration, and the one-shot
//! start/cancel event for this tick.  The service copies the time and the
//! event in before the FSM runs and applies `commands` after it returns.

use crate::config::CycleConfig;
use crate::drivers::stepper::StepperMode;
use crate::timing::{Micros, Millis, elapsed};

// ---------------------------------------------------------------------------
// Per-stage bookkeeping (reset on every transition)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleContext {
    /// Clock reading when the current stage was entered.
    pub stage_entered_at: Millis,
    /// Washing only: current drum direction (`true` = clockwise).
    pub wash_forward: bool,
    /// Washing only: start of the current agitation sub-phase.
    pub wash_phase_started_at: Millis,
}

impl CycleContext {
    pub const fn entered(now_ms: Millis) -> Self {
        Self {
            stage_entered_at: now_ms,
            wash_forward: false,
            wash_phase_started_at: now_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by stage handlers; applied by the service)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperCommand {
    pub mode: StepperMode,
    pub interval_us: Micros,
}

impl StepperCommand {
    pub const STOPPED: Self = Self {
        mode: StepperMode::Stopped,
        interval_us: 0,
    };
}

/// What the current stage wants the outputs to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    pub inlet: bool,
    pub drain: bool,
    pub stepper: StepperCommand,
}

impl Default for ActuatorCommands {
    fn default() -> Self {
        Self::all_off()
    }
}

impl ActuatorCommands {
    /// Both valves closed, drum stopped.
    pub const fn all_off() -> Self {
        Self {
            inlet: false,
            drain: false,
            stepper: StepperCommand::STOPPED,
        }
    }

    /// Inlet and drain are never commanded open together.
    pub const fn is_consistent(&self) -> bool {
        !(self.inlet && self.drain)
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    /// Clock reading for this tick.  Written by the service before the FSM runs.
    pub now_ms: Millis,
    pub cycle: CycleContext,
    pub commands: ActuatorCommands,
    pub config: CycleConfig,
    start_cancel: bool,
}

impl FsmContext {
    pub fn new(config: CycleConfig) -> Self {
        Self {
            now_ms: 0,
            cycle: CycleContext::default(),
            commands: ActuatorCommands::all_off(),
            config,
            start_cancel: false,
        }
    }

    /// Hand this tick's debounced START/CANCEL event to the handlers.
    pub fn set_start_cancel(&mut self, pressed: bool) {
        self.start_cancel = pressed;
    }

    /// Read-and-clear: at most one handler sees a given press.
    pub fn take_start_cancel(&mut self) -> bool {
        core::mem::take(&mut self.start_cancel)
    }

    /// Milliseconds since the current stage was entered.
    pub fn elapsed_in_stage(&self) -> Millis {
        elapsed(self.now_ms, self.cycle.stage_entered_at)
    }
}
