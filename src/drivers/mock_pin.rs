//! Host-side `embedded-hal` pin doubles for driver unit tests.
//!
//! Each pin shares its level through an `Rc<Cell<bool>>` so a test can
//! keep a probe while the driver owns the pin.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin that records its level and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
    fail: Rc<Cell<bool>>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts high, like an idle active-low relay line after boot.
    pub fn high() -> Self {
        let pin = Self::default();
        pin.level.set(true);
        pin
    }

    pub fn probe(&self) -> Self {
        self.clone()
    }

    pub fn is_set_high(&self) -> bool {
        self.level.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    fn write(&mut self, high: bool) -> Result<(), PinFault> {
        if self.fail.get() {
            return Err(PinFault);
        }
        self.writes.set(self.writes.get() + 1);
        self.level.set(high);
        Ok(())
    }
}

impl ErrorType for MockOutput {
    type Error = PinFault;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// Input pin whose level is driven by the test, or derived from a
/// function of other pins (for matrix scanning).
#[derive(Clone)]
pub struct MockInput {
    level: Rc<dyn Fn() -> bool>,
}

impl MockInput {
    pub fn fixed(level: Rc<Cell<bool>>) -> Self {
        Self {
            level: Rc::new(move || level.get()),
        }
    }

    pub fn from_fn(f: impl Fn() -> bool + 'static) -> Self {
        Self { level: Rc::new(f) }
    }
}

impl ErrorType for MockInput {
    type Error = PinFault;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok((self.level)())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!(self.level)())
    }
}
