//! Valve relay driver (opto-isolated relay board, active LOW).
//!
//! Each valve hangs off one relay channel.  The board energises a relay
//! when its input is pulled LOW, so "open" maps to a LOW line and boot
//! state (line HIGH) leaves every valve closed.
//!
//! ## Safety contract
//!
//! Inlet and drain must never be open together.  That is guaranteed by the
//! stage handlers and the access gate; this driver is a dumb actuator.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct Relay<P> {
    line: P,
    open: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Takes the line and drives it to the closed (HIGH) level.
    pub fn new(mut line: P) -> Result<Self, ActuatorError> {
        line.set_high().map_err(|_| ActuatorError::RelayWriteFailed)?;
        Ok(Self { line, open: false })
    }

    pub fn set(&mut self, open: bool) -> Result<(), ActuatorError> {
        let written = if open {
            self.line.set_low()
        } else {
            self.line.set_high()
        };
        written.map_err(|_| ActuatorError::RelayWriteFailed)?;
        self.open = open;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
