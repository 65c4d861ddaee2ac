//! Actuator and input drivers.
//!
//! Each driver owns its `embedded-hal` pins and knows the line polarity of
//! the board it talks to.  None of them carries cycle logic.

pub mod button;
pub mod keypad;
pub mod relay;
pub mod status_led;
pub mod stepper;

#[cfg(test)]
pub(crate) mod mock_pin;
