//! GPIO / peripheral pin assignments for the washer controller board.
//!
//! Single source of truth: `main.rs` wires peripherals from this table
//! and logs it at boot.  Change a pin here and in the matching
//! `peripherals.pins.gpioN` call in `main.rs`.
//!
//! ESP32-S3 strapping pins (0, 3, 45, 46) and the flash/PSRAM bus
//! (26–37) are avoided.

// ---------------------------------------------------------------------------
// Relays (active-LOW: logic low energises the coil)
// ---------------------------------------------------------------------------

/// Fill pump / inlet valve relay.
pub const RELAY_INLET_GPIO: i32 = 4;
/// Drain pump / drain valve relay.
pub const RELAY_DRAIN_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Drum stepper via L298N (IN1..IN4)
// ---------------------------------------------------------------------------

pub const STEPPER_IN1_GPIO: i32 = 6;
pub const STEPPER_IN2_GPIO: i32 = 7;
pub const STEPPER_IN3_GPIO: i32 = 15;
pub const STEPPER_IN4_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Button matrix (4x4), columns OUTPUT, rows INPUT_PULLUP
// ---------------------------------------------------------------------------

pub const MATRIX_COL_GPIOS: [i32; 4] = [9, 10, 11, 12];
pub const MATRIX_ROW_GPIOS: [i32; 4] = [13, 14, 21, 47];

/// Matrix dimensions.
pub const MATRIX_ROWS: usize = 4;
pub const MATRIX_COLS: usize = 4;

/// Position of the START / CANCEL key in the matrix.
pub const START_ROW: usize = 0;
pub const START_COL: usize = 0;

// ---------------------------------------------------------------------------
// Status LEDs + master enable line
// ---------------------------------------------------------------------------

pub const LED_GREEN_GPIO: i32 = 38;
pub const LED_YELLOW_GPIO: i32 = 39;
pub const LED_RED_GPIO: i32 = 40;

/// Enable output mirrored from the armed signal (drives the external
/// mains contactor input).
pub const SIGNAL_GPIO: i32 = 41;

// ---------------------------------------------------------------------------
// Access gate
// ---------------------------------------------------------------------------

/// Armed input from the access-control board.  Active LOW.
pub const ARMED_INPUT_GPIO: i32 = 42;

// ---------------------------------------------------------------------------
// Character LCD (I²C backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 1;
pub const I2C_SCL_GPIO: i32 = 2;
pub const LCD_ADDR: u8 = 0x27;
pub const LCD_COLS: usize = 20;
pub const LCD_ROWS: usize = 4;
