//! Concrete stage handler functions and their static descriptors.
//!
//! Each stage is defined by three plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  IDLE ──[start]──▶ FILLING ──[fill_ms]──▶ WASHING ──[wash_ms]──▶ RINSING
//!    ▲                                                               │
//!    │                                                          [rinse_ms]
//!    │                                                               ▼
//!  FINISHED ◀──[drain_ms]── DRAINING ◀──[spin_ms]───────────── SPINNING
//!    │
//!    └──[start / finished_hold_ms]──▶ IDLE
//!
//!  FILLING..DRAINING ──[cancel]──▶ IDLE
//! ```
//!
//! Every entry action writes inlet, drain and stepper explicitly, so the
//! outputs depend only on the stage being entered.  Every update handler
//! checks the start/cancel event before its time budget.

use super::context::{ActuatorCommands, FsmContext, StepperCommand};
use super::{Stage, StateDescriptor};
use crate::drivers::stepper::StepperMode;
use crate::timing::{Micros, has_elapsed};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Descriptors
// ═══════════════════════════════════════════════════════════════════════════

pub static IDLE: StateDescriptor = StateDescriptor {
    stage: Stage::Idle,
    name: "Idle",
    on_enter: Some(idle_enter),
    on_exit: None,
    on_update: idle_update,
};

pub static FILLING: StateDescriptor = StateDescriptor {
    stage: Stage::Filling,
    name: "Filling",
    on_enter: Some(filling_enter),
    on_exit: Some(filling_exit),
    on_update: filling_update,
};

pub static WASHING: StateDescriptor = StateDescriptor {
    stage: Stage::Washing,
    name: "Washing",
    on_enter: Some(washing_enter),
    on_exit: None,
    on_update: washing_update,
};

pub static RINSING: StateDescriptor = StateDescriptor {
    stage: Stage::Rinsing,
    name: "Rinsing",
    on_enter: Some(rinsing_enter),
    on_exit: None,
    on_update: rinsing_update,
};

pub static SPINNING: StateDescriptor = StateDescriptor {
    stage: Stage::Spinning,
    name: "Spinning",
    on_enter: Some(spinning_enter),
    on_exit: None,
    on_update: spinning_update,
};

pub static DRAINING: StateDescriptor = StateDescriptor {
    stage: Stage::Draining,
    name: "Draining",
    on_enter: Some(draining_enter),
    on_exit: Some(draining_exit),
    on_update: draining_update,
};

pub static FINISHED: StateDescriptor = StateDescriptor {
    stage: Stage::Finished,
    name: "Finished",
    on_enter: Some(finished_enter),
    on_exit: None,
    on_update: finished_update,
};

fn drum(mode: StepperMode, interval_us: Micros) -> StepperCommand {
    StepperCommand { mode, interval_us }
}

/// Shared by every running stage: a press while running means "cancel".
fn cancelled(ctx: &mut FsmContext, stage: &str) -> bool {
    if ctx.take_start_cancel() {
        info!("{stage}: cancelled after {}ms", ctx.elapsed_in_stage());
        return true;
    }
    false
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
}

fn idle_update(ctx: &mut FsmContext) -> Option<Stage> {
    if ctx.take_start_cancel() {
        info!("IDLE: start pressed, cycle of {}ms begins", ctx.config.cycle_ms());
        return Some(Stage::Filling);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FILLING: inlet open
// ═══════════════════════════════════════════════════════════════════════════

fn filling_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands {
        inlet: true,
        drain: false,
        stepper: StepperCommand::STOPPED,
    };
}

fn filling_exit(ctx: &mut FsmContext) {
    ctx.commands.inlet = false;
}

fn filling_update(ctx: &mut FsmContext) -> Option<Stage> {
    if cancelled(ctx, "FILLING") {
        return Some(Stage::Idle);
    }
    if ctx.elapsed_in_stage() >= ctx.config.fill_ms {
        return Some(Stage::Washing);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  WASHING: agitate, reversing the drum every sub-phase
// ═══════════════════════════════════════════════════════════════════════════

fn washing_enter(ctx: &mut FsmContext) {
    ctx.cycle.wash_forward = true;
    ctx.cycle.wash_phase_started_at = ctx.now_ms;
    ctx.commands = ActuatorCommands {
        inlet: false,
        drain: false,
        stepper: drum(StepperMode::Clockwise, ctx.config.wash_step_interval_us),
    };
}

fn washing_update(ctx: &mut FsmContext) -> Option<Stage> {
    if cancelled(ctx, "WASHING") {
        return Some(Stage::Idle);
    }
    if ctx.elapsed_in_stage() >= ctx.config.wash_ms {
        return Some(Stage::Rinsing);
    }

    if has_elapsed(ctx.now_ms, ctx.cycle.wash_phase_started_at, ctx.config.agitate_ms) {
        ctx.cycle.wash_forward = !ctx.cycle.wash_forward;
        ctx.cycle.wash_phase_started_at = ctx.now_ms;
        let mode = if ctx.cycle.wash_forward {
            StepperMode::Clockwise
        } else {
            StepperMode::CounterClockwise
        };
        ctx.commands.stepper = drum(mode, ctx.config.wash_step_interval_us);
        debug!("WASHING: drum reversed to {mode:?}");
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RINSING / SPINNING: drum clockwise at their own speeds
// ═══════════════════════════════════════════════════════════════════════════

fn rinsing_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands {
        inlet: false,
        drain: false,
        stepper: drum(StepperMode::Clockwise, ctx.config.rinse_step_interval_us),
    };
}

fn rinsing_update(ctx: &mut FsmContext) -> Option<Stage> {
    if cancelled(ctx, "RINSING") {
        return Some(Stage::Idle);
    }
    if ctx.elapsed_in_stage() >= ctx.config.rinse_ms {
        return Some(Stage::Spinning);
    }
    None
}

fn spinning_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands {
        inlet: false,
        drain: false,
        stepper: drum(StepperMode::Clockwise, ctx.config.spin_step_interval_us),
    };
}

fn spinning_update(ctx: &mut FsmContext) -> Option<Stage> {
    if cancelled(ctx, "SPINNING") {
        return Some(Stage::Idle);
    }
    if ctx.elapsed_in_stage() >= ctx.config.spin_ms {
        return Some(Stage::Draining);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DRAINING: drain open, drum stopped
// ═══════════════════════════════════════════════════════════════════════════

fn draining_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands {
        inlet: false,
        drain: true,
        stepper: StepperCommand::STOPPED,
    };
}

fn draining_exit(ctx: &mut FsmContext) {
    ctx.commands.drain = false;
}

fn draining_update(ctx: &mut FsmContext) -> Option<Stage> {
    if cancelled(ctx, "DRAINING") {
        return Some(Stage::Idle);
    }
    if ctx.elapsed_in_stage() >= ctx.config.drain_ms {
        return Some(Stage::Finished);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FINISHED: everything off, message held until acknowledged or timed out
// ═══════════════════════════════════════════════════════════════════════════

fn finished_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
}

fn finished_update(ctx: &mut FsmContext) -> Option<Stage> {
    if ctx.take_start_cancel() {
        return Some(Stage::Idle);
    }
    if ctx.elapsed_in_stage() >= ctx.config.finished_hold_ms {
        return Some(Stage::Idle);
    }
    None
}
