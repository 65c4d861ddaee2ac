//! Status indicators: green / yellow / red LEDs plus the enable line.
//!
//! | State            | Green | Yellow | Red | Enable |
//! |------------------|-------|--------|-----|--------|
//! | Locked           | off   | off    | on  | low    |
//! | Armed, idle      | on    | off    | off | high   |
//! | Armed, running   | on    | on     | off | high   |
//!
//! The enable line follows the access gate and is what external hardware
//! (buzzer, door interlock) watches.  All lines are active HIGH.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusLights {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
    pub enable: bool,
}

impl StatusLights {
    pub const fn locked() -> Self {
        Self {
            green: false,
            yellow: false,
            red: true,
            enable: false,
        }
    }

    pub const fn armed(running: bool) -> Self {
        Self {
            green: true,
            yellow: running,
            red: false,
            enable: true,
        }
    }
}

/// Owns the four indicator lines, in the order green, yellow, red, enable.
pub struct StatusLeds<P> {
    lines: [P; 4],
    current: StatusLights,
}

impl<P: OutputPin> StatusLeds<P> {
    pub fn new(lines: [P; 4]) -> Self {
        Self {
            lines,
            current: StatusLights::default(),
        }
    }

    /// Drive every line.  Writes are skipped when nothing changed.
    pub fn show(&mut self, lights: StatusLights) -> Result<(), ActuatorError> {
        if lights == self.current {
            return Ok(());
        }
        let levels = [lights.green, lights.yellow, lights.red, lights.enable];
        let mut result = Ok(());
        for (line, high) in self.lines.iter_mut().zip(levels) {
            let written = if high { line.set_high() } else { line.set_low() };
            if written.is_err() {
                result = Err(ActuatorError::IndicatorWriteFailed);
            }
        }
        if result.is_ok() {
            self.current = lights;
        }
        result
    }

    pub fn current(&self) -> StatusLights {
        self.current
    }
}
