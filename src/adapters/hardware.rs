//! Hardware adapter: bridges the board's drivers to domain port traits.
//!
//! Owns both valve relays, the coil driver, the status LEDs, the key
//! matrix and the armed input line, exposing them through
//! [`ArmingPort`], [`InputPort`] and [`ActuatorPort`].  This is the only
//! module that touches pins.
//!
//! Port methods cannot fail.  A driver error is logged with `warn!` once
//! per line until that line works again, so a dead line does not flood
//! the console, and the remaining outputs are still driven.  Read failures fail safe: a broken
//! armed line reads as locked and a broken matrix reads as "not pressed".

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use crate::app::ports::{ActuatorPort, ArmingPort, InputPort};
use crate::drivers::keypad::Keypad;
use crate::drivers::relay::Relay;
use crate::drivers::status_led::{StatusLeds, StatusLights};
use crate::drivers::stepper::{CoilDriver, CoilPattern};
use crate::error::{Error, InputError};
use crate::pins::{START_COL, START_ROW};

/// Board lines tracked separately for fault reporting.
#[derive(Debug, Clone, Copy)]
enum Line {
    Armed,
    Keypad,
    Inlet,
    Drain,
    Coils,
    Leds,
}

impl Line {
    const COUNT: usize = 6;

    fn label(self) -> &'static str {
        match self {
            Line::Armed => "armed line",
            Line::Keypad => "keypad",
            Line::Inlet => "inlet relay",
            Line::Drain => "drain relay",
            Line::Coils => "stepper coils",
            Line::Leds => "status leds",
        }
    }
}

pub struct HardwareAdapter<O, I> {
    inlet: Relay<O>,
    drain: Relay<O>,
    coils: CoilDriver<O>,
    leds: StatusLeds<O>,
    keypad: Keypad<O, I>,
    /// Active LOW: pulled to ground while the gate is armed.
    armed_line: I,
    /// Last error reported per line; cleared when the line works again.
    line_faults: [Option<Error>; Line::COUNT],
    faults: u32,
    warnings: u32,
}

impl<O: OutputPin, I: InputPin> HardwareAdapter<O, I> {
    pub fn new(
        inlet: Relay<O>,
        drain: Relay<O>,
        coils: CoilDriver<O>,
        leds: StatusLeds<O>,
        keypad: Keypad<O, I>,
        armed_line: I,
    ) -> Self {
        Self {
            inlet,
            drain,
            coils,
            leds,
            keypad,
            armed_line,
            line_faults: [None; Line::COUNT],
            faults: 0,
            warnings: 0,
        }
    }

    /// Driver errors seen since boot.
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    /// Fault warnings actually written to the log.
    pub fn fault_warnings(&self) -> u32 {
        self.warnings
    }

    fn report<E: Into<Error>>(&mut self, line: Line, result: Result<(), E>) {
        let slot = &mut self.line_faults[line as usize];
        match result {
            Ok(()) => {
                if slot.take().is_some() {
                    info!("{}: recovered", line.label());
                }
            }
            Err(e) => {
                let e = e.into();
                self.faults = self.faults.wrapping_add(1);
                if *slot != Some(e) {
                    warn!("{}: {e}", line.label());
                    *slot = Some(e);
                    self.warnings = self.warnings.wrapping_add(1);
                }
            }
        }
    }
}

// ── ArmingPort implementation ─────────────────────────────────

impl<O: OutputPin, I: InputPin> ArmingPort for HardwareAdapter<O, I> {
    fn is_armed(&mut self) -> bool {
        let sample = self
            .armed_line
            .is_low()
            .map_err(|_| InputError::GpioReadFailed);
        self.report(Line::Armed, sample.map(drop));
        sample.unwrap_or(false)
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<O: OutputPin, I: InputPin> InputPort for HardwareAdapter<O, I> {
    fn start_key_raw(&mut self) -> bool {
        let sample = self.keypad.read_key(START_ROW, START_COL);
        self.report(Line::Keypad, sample.map(drop));
        sample.unwrap_or(false)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<O: OutputPin, I: InputPin> ActuatorPort for HardwareAdapter<O, I> {
    fn set_inlet(&mut self, open: bool) {
        if open == self.inlet.is_open() {
            return;
        }
        let result = self.inlet.set(open);
        self.report(Line::Inlet, result);
    }

    fn set_drain(&mut self, open: bool) {
        if open == self.drain.is_open() {
            return;
        }
        let result = self.drain.set(open);
        self.report(Line::Drain, result);
    }

    fn set_coils(&mut self, pattern: CoilPattern) {
        let result = self.coils.apply(pattern);
        self.report(Line::Coils, result);
    }

    fn set_status(&mut self, lights: StatusLights) {
        let result = self.leds.show(lights);
        self.report(Line::Leds, result);
    }

    fn all_off(&mut self) {
        // Every line is written unconditionally, even if one fails.
        let result = self.inlet.close();
        self.report(Line::Inlet, result);
        let result = self.drain.close();
        self.report(Line::Drain, result);
        let result = self.coils.apply(CoilPattern::OFF);
        self.report(Line::Coils, result);
    }
}
