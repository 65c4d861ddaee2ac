//! Drum stepper: L298N coil driver and non-blocking phase sequencer.
//!
//! ## Phase table
//!
//! Full-step, two coils energised per phase:
//!
//! | Phase | IN1 | IN2 | IN3 | IN4 |
//! |-------|-----|-----|-----|-----|
//! | 0     | 1   | 0   | 1   | 0   |
//! | 1     | 0   | 1   | 1   | 0   |
//! | 2     | 0   | 1   | 0   | 1   |
//! | 3     | 1   | 0   | 0   | 1   |
//!
//! Clockwise walks the table forwards, counter-clockwise backwards.
//!
//! ## Pacing
//!
//! [`StepperSequencer::tick`] is called on every scheduler pass but only
//! advances when `step_interval_us` has elapsed since the last step, so the
//! drum speed is set by the interval and not by how fast the outer loop
//! spins.

use embedded_hal::digital::OutputPin;
use log::debug;
use serde::Serialize;

use crate::app::ports::ActuatorPort;
use crate::error::ActuatorError;
use crate::timing::{Micros, has_elapsed};

// ---------------------------------------------------------------------------
// Coil patterns
// ---------------------------------------------------------------------------

/// Four coil lines packed into the low nibble; bit 0 = IN1 … bit 3 = IN4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoilPattern(u8);

impl CoilPattern {
    /// Every coil de-energised.
    pub const OFF: Self = Self(0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_energised(self) -> bool {
        self.0 != 0
    }

    /// Level of coil line `n` (0 = IN1).
    pub const fn coil(self, n: usize) -> bool {
        self.0 & (1 << n) != 0
    }
}

pub const PHASE_TABLE: [CoilPattern; 4] = [
    CoilPattern::from_bits(0b0101), // IN1 + IN3
    CoilPattern::from_bits(0b0110), // IN2 + IN3
    CoilPattern::from_bits(0b1010), // IN2 + IN4
    CoilPattern::from_bits(0b1001), // IN1 + IN4
];

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepperMode {
    Stopped,
    Clockwise,
    CounterClockwise,
}

/// Owns the rotor phase.  Nothing else writes `phase_index`.
#[derive(Debug)]
pub struct StepperSequencer {
    mode: StepperMode,
    phase_index: u8,
    step_interval_us: Micros,
    last_step_at: Micros,
    steps: u32,
}

impl Default for StepperSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepperSequencer {
    pub const fn new() -> Self {
        Self {
            mode: StepperMode::Stopped,
            phase_index: 0,
            step_interval_us: 0,
            last_step_at: 0,
            steps: 0,
        }
    }

    /// Change direction and speed.  Takes effect on the next due step;
    /// never touches the coils itself.
    pub fn set_mode(&mut self, mode: StepperMode, interval_us: Micros) {
        if mode != self.mode || interval_us != self.step_interval_us {
            debug!("stepper: {:?} @ {}us -> {:?} @ {}us", self.mode, self.step_interval_us, mode, interval_us);
        }
        self.mode = mode;
        self.step_interval_us = interval_us;
    }

    /// Advance one phase if a step is due.  Returns `true` when it stepped.
    pub fn tick(&mut self, now_us: Micros, coils: &mut impl ActuatorPort) -> bool {
        let delta: u8 = match self.mode {
            StepperMode::Stopped => return false,
            StepperMode::Clockwise => 1,
            StepperMode::CounterClockwise => 3, // -1 mod 4
        };

        if !has_elapsed(now_us, self.last_step_at, self.step_interval_us) {
            return false;
        }

        self.phase_index = (self.phase_index + delta) & 0b11;
        coils.set_coils(PHASE_TABLE[self.phase_index as usize]);
        self.last_step_at = now_us;
        self.steps = self.steps.wrapping_add(1);
        true
    }

    /// Halt and de-energise every coil immediately (keeps the motor cool
    /// while idle).
    pub fn stop(&mut self, coils: &mut impl ActuatorPort) {
        if self.mode != StepperMode::Stopped {
            debug!("stepper: stop after {} steps", self.steps);
        }
        self.mode = StepperMode::Stopped;
        coils.set_coils(CoilPattern::OFF);
    }

    pub fn mode(&self) -> StepperMode {
        self.mode
    }

    pub fn phase_index(&self) -> u8 {
        self.phase_index
    }

    pub fn interval_us(&self) -> Micros {
        self.step_interval_us
    }

    /// Steps taken since boot (wraps).
    pub fn step_count(&self) -> u32 {
        self.steps
    }
}

// ---------------------------------------------------------------------------
// Coil driver (L298N inputs are active HIGH)
// ---------------------------------------------------------------------------

pub struct CoilDriver<P> {
    lines: [P; 4],
}

impl<P: OutputPin> CoilDriver<P> {
    /// Takes IN1..IN4 in order.
    pub fn new(lines: [P; 4]) -> Self {
        Self { lines }
    }

    /// Drive all four lines.  Every line is attempted even if an earlier
    /// one fails.
    pub fn apply(&mut self, pattern: CoilPattern) -> Result<(), ActuatorError> {
        let mut result = Ok(());
        for (n, line) in self.lines.iter_mut().enumerate() {
            let written = if pattern.coil(n) {
                line.set_high()
            } else {
                line.set_low()
            };
            if written.is_err() {
                result = Err(ActuatorError::CoilWriteFailed);
            }
        }
        result
    }
}
