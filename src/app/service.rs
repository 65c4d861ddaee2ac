//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, its context, the stepper sequencer, the
//! debounced START key, the access gate and the display throttle.  Each
//! field has exactly one writer: the service itself.  All I/O flows
//! through port traits injected at call sites, so the whole cycle runs
//! against mock adapters and a fake clock in tests.
//!
//! ```text
//!  Clock ─────────┐
//!  ArmingPort ───▶ ┌──────────────────────────────┐ ──▶ DisplayPort
//!  InputPort ────▶ │          AppService          │ ──▶ EventSink
//! ActuatorPort ◀── │ Gate · Button · Stepper · FSM│
//!                  └──────────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Access gate.  Locked: stepper stopped, outputs off, cycle reset to
//!    Idle, "locked" screen offered to the throttle.  Nothing else runs.
//! 2. START key sampled and debounced.
//! 3. Stepper stepped if due.
//! 4. FSM updated with this tick's press, if any.
//! 5. FSM intent applied to valves, drum and indicators.
//! 6. Screen repainted if its content changed (throttled).

use log::info;

use crate::config::CycleConfig;
use crate::display::{Frame, Refresh};
use crate::drivers::button::DebouncedButton;
use crate::drivers::status_led::StatusLights;
use crate::drivers::stepper::{StepperMode, StepperSequencer};
use crate::fsm::context::{ActuatorCommands, FsmContext};
use crate::fsm::{Fsm, Stage};
use crate::safety::{GateEvent, SafetyGate};
use crate::timing::Millis;

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, ArmingPort, Clock, DisplayPort, EventSink, InputPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    stepper: StepperSequencer,
    button: DebouncedButton,
    gate: SafetyGate,
    refresh: Refresh,
}

impl AppService {
    /// Construct the service.  Does **not** start the FSM; call
    /// [`start`](Self::start) next.
    pub fn new(config: CycleConfig) -> Self {
        let button = DebouncedButton::new(config.debounce_ms);
        let refresh = Refresh::new(config.display_refresh_ms);
        Self {
            fsm: Fsm::new(),
            ctx: FsmContext::new(config),
            stepper: StepperSequencer::new(),
            button,
            gate: SafetyGate::new(),
            refresh,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, clock: &impl Clock, sink: &mut impl EventSink) {
        self.ctx.now_ms = clock.now_ms();
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_stage()));
        info!("AppService started in {}", self.fsm.current_stage());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cooperative tick.  Never blocks.
    ///
    /// `hw` satisfies the arming, input and actuator ports at once, which
    /// avoids a double mutable borrow of the board.
    pub fn tick(
        &mut self,
        clock: &impl Clock,
        hw: &mut (impl ArmingPort + InputPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        let now_ms = clock.now_ms();
        let now_us = clock.now_us();
        self.ctx.now_ms = now_ms;
        let prev = self.fsm.current_stage();

        // 1. Access gate
        let gate_event = self.gate.observe(hw.is_armed());
        if gate_event == Some(GateEvent::Engaged) {
            sink.emit(&AppEvent::Locked { from: prev });
        }
        if !self.gate.is_armed() {
            self.quiesce(hw, display, now_ms);
            return;
        }

        // 2. START key
        let raw = hw.start_key_raw();
        if gate_event == Some(GateEvent::Released) {
            self.button.reset(raw, now_ms);
            sink.emit(&AppEvent::Armed);
        }
        self.button.update(raw, now_ms);

        // 3. Drum
        self.stepper.tick(now_us, hw);

        // 4. Cycle
        let pressed = self.button.take_press();
        if pressed {
            sink.emit(&AppEvent::StartCancel { stage: prev });
        }
        self.ctx.set_start_cancel(pressed);
        self.fsm.tick(&mut self.ctx);
        let stage = self.fsm.current_stage();

        // 5. Outputs
        self.apply_actuators(hw);
        hw.set_status(StatusLights::armed(stage.is_running()));

        // 6. Screen
        let frame = Frame::compose(stage, self.ctx.cycle.wash_forward);
        self.show(&frame, display, now_ms);

        if stage != prev {
            sink.emit(&AppEvent::StageChanged {
                from: prev,
                to: stage,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            stage: self.fsm.current_stage(),
            ms_in_stage: self.ctx.elapsed_in_stage(),
            inlet_open: self.ctx.commands.inlet,
            drain_open: self.ctx.commands.drain,
            stepper: self.stepper.mode(),
            phase: self.stepper.phase_index(),
            armed: self.gate.is_armed(),
            dropped_presses: self.button.dropped_presses(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.fsm.current_stage()
    }

    /// Actuator intent written by the current stage.
    pub fn commands(&self) -> ActuatorCommands {
        self.ctx.commands
    }

    pub fn stepper(&self) -> &StepperSequencer {
        &self.stepper
    }

    pub fn is_armed(&self) -> bool {
        self.gate.is_armed()
    }

    pub fn config(&self) -> &CycleConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Locked tick: everything off, cycle back to Idle.  The notice is
    /// painted once per lockout; the throttle drops the repeats.
    fn quiesce(
        &mut self,
        hw: &mut impl ActuatorPort,
        display: &mut impl DisplayPort,
        now_ms: Millis,
    ) {
        self.stepper.stop(hw);
        hw.all_off();
        self.fsm.reset(&mut self.ctx);
        hw.set_status(StatusLights::locked());
        self.show(&Frame::locked(), display, now_ms);
    }

    fn show(&mut self, frame: &Frame, display: &mut impl DisplayPort, now_ms: Millis) {
        if self.refresh.should_render(frame, now_ms) {
            display.render(frame);
        }
    }

    /// Translate the FSM's actuator intent into port calls.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let cmds = self.ctx.commands;
        debug_assert!(cmds.is_consistent(), "inlet and drain both commanded open");

        hw.set_inlet(cmds.inlet);
        hw.set_drain(cmds.drain);

        match cmds.stepper.mode {
            StepperMode::Stopped => {
                if self.stepper.mode() != StepperMode::Stopped {
                    self.stepper.stop(hw);
                }
            }
            mode => self.stepper.set_mode(mode, cmds.stepper.interval_us),
        }
    }
}
