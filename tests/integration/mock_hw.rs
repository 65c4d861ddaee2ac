//! Mock hardware, fake clock and recording sinks for integration tests.
//!
//! `MockHardware` records every actuator call so tests can assert on the
//! full command history without touching GPIO.  `FakeClock` is advanced by
//! hand, so a whole wash cycle runs in milliseconds of wall time.

use std::cell::Cell;

use washer::app::events::AppEvent;
use washer::app::ports::{ActuatorPort, ArmingPort, Clock, DisplayPort, EventSink, InputPort};
use washer::app::service::AppService;
use washer::config::CycleConfig;
use washer::display::Frame;
use washer::drivers::status_led::StatusLights;
use washer::drivers::stepper::CoilPattern;
use washer::fsm::Stage;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Inlet(bool),
    Drain(bool),
    Coils(CoilPattern),
    Status(StatusLights),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockHardware {
    /// Level the armed line reports.
    pub armed: bool,
    /// Raw START key level.
    pub key: bool,

    pub inlet: bool,
    pub drain: bool,
    pub coils: CoilPattern,
    pub status: StatusLights,
    pub calls: Vec<ActuatorCall>,
    /// Set if inlet and drain were ever open at the same time.
    pub valves_overlapped: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn armed() -> Self {
        Self {
            armed: true,
            ..Self::default()
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Distinct coil patterns written (excluding OFF).
    pub fn steps_taken(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Coils(p) if p.is_energised()))
            .count()
    }

    pub fn quiet(&self) -> bool {
        !self.inlet && !self.drain && !self.coils.is_energised()
    }

    fn check_valves(&mut self) {
        if self.inlet && self.drain {
            self.valves_overlapped = true;
        }
    }
}

impl ArmingPort for MockHardware {
    fn is_armed(&mut self) -> bool {
        self.armed
    }
}

impl InputPort for MockHardware {
    fn start_key_raw(&mut self) -> bool {
        self.key
    }
}

impl ActuatorPort for MockHardware {
    fn set_inlet(&mut self, open: bool) {
        self.calls.push(ActuatorCall::Inlet(open));
        self.inlet = open;
        self.check_valves();
    }

    fn set_drain(&mut self, open: bool) {
        self.calls.push(ActuatorCall::Drain(open));
        self.drain = open;
        self.check_valves();
    }

    fn set_coils(&mut self, pattern: CoilPattern) {
        self.calls.push(ActuatorCall::Coils(pattern));
        self.coils = pattern;
    }

    fn set_status(&mut self, lights: StatusLights) {
        self.calls.push(ActuatorCall::Status(lights));
        self.status = lights;
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
        self.inlet = false;
        self.drain = false;
        self.coils = CoilPattern::OFF;
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Microsecond-resolution fake.  Both counters derive from one 64-bit
/// value and are truncated to `u32`, like the real clock.
pub struct FakeClock {
    us: Cell<u64>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self::starting_at_ms(0)
    }

    pub fn starting_at_ms(ms: u64) -> Self {
        Self {
            us: Cell::new(ms * 1_000),
        }
    }

    pub fn advance_us(&self, us: u64) {
        self.us.set(self.us.get() + us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1_000);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u32 {
        (self.us.get() / 1_000) as u32
    }

    fn now_us(&self) -> u32 {
        self.us.get() as u32
    }
}

// ── Recording display / event sink ────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    /// Clock reading stamped on each render.  Set by the bench every tick.
    pub now_ms: u32,
    /// (clock ms at render, frame)
    pub frames: Vec<(u32, Frame)>,
}

impl DisplayPort for RecordingDisplay {
    fn render(&mut self, frame: &Frame) {
        self.frames.push((self.now_ms, frame.clone()));
    }
}

#[derive(Debug, Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Bench: service + mocks driven at a fixed tick period ──────

pub struct Bench {
    pub app: AppService,
    pub clock: FakeClock,
    pub hw: MockHardware,
    pub display: RecordingDisplay,
    pub sink: LogSink,
    /// Tick period in microseconds.
    pub tick_us: u64,
}

#[allow(dead_code)]
impl Bench {
    /// Armed, started, 1 ms ticks, default config.
    pub fn new() -> Self {
        Self::with(CycleConfig::default(), FakeClock::new())
    }

    pub fn with(config: CycleConfig, clock: FakeClock) -> Self {
        let mut sink = LogSink::new();
        let mut app = AppService::new(config);
        app.start(&clock, &mut sink);
        Self {
            app,
            clock,
            hw: MockHardware::armed(),
            display: RecordingDisplay::default(),
            sink,
            tick_us: 1_000,
        }
    }

    pub fn config(&self) -> CycleConfig {
        self.app.config().clone()
    }

    pub fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    /// Advance one tick period and run one tick.
    pub fn tick(&mut self) {
        self.clock.advance_us(self.tick_us);
        self.display.now_ms = self.clock.now_ms();
        self.app
            .tick(&self.clock, &mut self.hw, &mut self.display, &mut self.sink);
    }

    pub fn run_ms(&mut self, ms: u64) {
        let ticks = ms * 1_000 / self.tick_us;
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Hold the key for 200 ms, release for 200 ms.
    pub fn press(&mut self) {
        self.hw.key = true;
        self.run_ms(200);
        self.hw.key = false;
        self.run_ms(200);
    }

    /// Tick until the stage changes to `stage`.  Returns the clock reading
    /// when it did, or `None` after `limit_ms`.
    pub fn run_until(&mut self, stage: Stage, limit_ms: u64) -> Option<u32> {
        let ticks = limit_ms * 1_000 / self.tick_us;
        for _ in 0..ticks {
            self.tick();
            if self.app.stage() == stage {
                return Some(self.now_ms());
            }
        }
        None
    }

    pub fn stage_changes(&self) -> Vec<(Stage, Stage)> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StageChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}
