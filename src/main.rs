//! Washer controller firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HardwareAdapter          LogEventSink   MonotonicClock    │
//! │  (Arming+Input+Actuator)  LogDisplay     (Clock)           │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                 │  │
//! │  │  Gate · Button · Stepper · FSM · Display throttle    │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{
    AnyIOPin, AnyOutputPin, IOPin as _, Input, Output, OutputPin as _, PinDriver, Pull,
};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use washer::adapters::hardware::HardwareAdapter;
use washer::adapters::log_sink::{LogDisplay, LogEventSink};
use washer::adapters::time::MonotonicClock;
use washer::app::events::AppEvent;
use washer::app::ports::{Clock, EventSink};
use washer::app::service::AppService;
use washer::config::CycleConfig;
use washer::drivers::keypad::Keypad;
use washer::drivers::relay::Relay;
use washer::drivers::status_led::StatusLeds;
use washer::drivers::stepper::CoilDriver;
use washer::error::Error;
use washer::pins;
use washer::timing::Periodic;

type Out = PinDriver<'static, AnyOutputPin, Output>;
type In = PinDriver<'static, AnyIOPin, Input>;

fn output(pin: AnyOutputPin) -> Result<Out> {
    Ok(PinDriver::output(pin)?)
}

/// `set_pull` needs an IO-capable pin, so inputs are downgraded to
/// `AnyIOPin` rather than `AnyInputPin`.
fn pulled_up(pin: AnyIOPin) -> Result<In> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Washer v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (fixed per image) ────────────────────
    let config = CycleConfig::resolve(option_env!("WASHER_CONFIG"));
    info!("Config: {config:?}");

    // ── 3. Pins ───────────────────────────────────────────────
    info!(
        "Pins: inlet={} drain={} coils={:?} cols={:?} rows={:?} leds={}/{}/{} enable={} armed={}",
        pins::RELAY_INLET_GPIO,
        pins::RELAY_DRAIN_GPIO,
        [
            pins::STEPPER_IN1_GPIO,
            pins::STEPPER_IN2_GPIO,
            pins::STEPPER_IN3_GPIO,
            pins::STEPPER_IN4_GPIO,
        ],
        pins::MATRIX_COL_GPIOS,
        pins::MATRIX_ROW_GPIOS,
        pins::LED_GREEN_GPIO,
        pins::LED_YELLOW_GPIO,
        pins::LED_RED_GPIO,
        pins::SIGNAL_GPIO,
        pins::ARMED_INPUT_GPIO,
    );
    info!(
        "LCD: {}x{} at I2C 0x{:02X} (sda={} scl={}), mirrored to the log",
        pins::LCD_COLS,
        pins::LCD_ROWS,
        pins::LCD_ADDR,
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
    );

    let p = Peripherals::take()?.pins;

    let inlet = Relay::new(output(p.gpio4.downgrade_output())?).map_err(Error::from)?;
    let drain = Relay::new(output(p.gpio5.downgrade_output())?).map_err(Error::from)?;
    let coils = CoilDriver::new([
        output(p.gpio6.downgrade_output())?,
        output(p.gpio7.downgrade_output())?,
        output(p.gpio15.downgrade_output())?,
        output(p.gpio16.downgrade_output())?,
    ]);
    let leds = StatusLeds::new([
        output(p.gpio38.downgrade_output())?,
        output(p.gpio39.downgrade_output())?,
        output(p.gpio40.downgrade_output())?,
        output(p.gpio41.downgrade_output())?,
    ]);
    let keypad = Keypad::new(
        [
            output(p.gpio9.downgrade_output())?,
            output(p.gpio10.downgrade_output())?,
            output(p.gpio11.downgrade_output())?,
            output(p.gpio12.downgrade_output())?,
        ],
        [
            pulled_up(p.gpio13.downgrade())?,
            pulled_up(p.gpio14.downgrade())?,
            pulled_up(p.gpio21.downgrade())?,
            pulled_up(p.gpio47.downgrade())?,
        ],
    )
    .map_err(Error::from)?;
    let armed = pulled_up(p.gpio42.downgrade())?;

    let mut hw = HardwareAdapter::new(inlet, drain, coils, leds, keypad, armed);
    let clock = MonotonicClock::new();
    let mut lcd = LogDisplay::new();
    let mut sink = LogEventSink::new();

    // ── 4. App service ────────────────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&clock, &mut sink);

    let mut telemetry = Periodic::new(config.telemetry_interval_ms);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(&clock, &mut hw, &mut lcd, &mut sink);

        if telemetry.due(clock.now_ms()) {
            sink.emit(&AppEvent::Telemetry(app.build_telemetry()));
            if hw.fault_count() > 0 {
                warn!(
                    "GPIO faults since boot: {} ({} logged)",
                    hw.fault_count(),
                    hw.fault_warnings()
                );
            }
        }

        // Outside the tick: lets the idle task run and feed the watchdog.
        FreeRtos::delay_ms(1);
    }
}
