//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                | Connects to             |
//! |------------|---------------------------|-------------------------|
//! | `hardware` | ArmingPort                | Armed input line        |
//! |            | InputPort                 | 4x4 key matrix          |
//! |            | ActuatorPort              | Relays, L298N, LEDs     |
//! | `log_sink` | EventSink, DisplayPort    | Serial log output       |
//! | `time`     | Clock                     | ESP32 system timer      |

pub mod hardware;
pub mod log_sink;
pub mod time;
