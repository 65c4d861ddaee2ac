//! Function-pointer finite state machine engine for the wash cycle.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  Stage ──match──▶ &'static StateDescriptor                 │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ Stage    │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Idle     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Filling  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Washing  │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Rinsing  │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Spinning │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Draining │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Finished │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  └──────────┴───────────┴──────────┴───────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** stage.  If it
//! returns `Some(next)`, the engine runs `on_exit` for the current stage,
//! resets the per-stage [`CycleContext`](context::CycleContext) to the
//! current time, then runs `on_enter` for the next.  All functions receive
//! `&mut FsmContext`.
//!
//! The lookup from [`Stage`] to descriptor is an exhaustive `match`, so
//! adding a stage without a descriptor does not compile.

pub mod context;
pub mod states;

use context::{CycleContext, FsmContext};
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Stage identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Idle,
    Filling,
    Washing,
    Rinsing,
    Spinning,
    Draining,
    Finished,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Idle,
        Stage::Filling,
        Stage::Washing,
        Stage::Rinsing,
        Stage::Spinning,
        Stage::Draining,
        Stage::Finished,
    ];

    pub fn descriptor(self) -> &'static StateDescriptor {
        match self {
            Stage::Idle => &states::IDLE,
            Stage::Filling => &states::FILLING,
            Stage::Washing => &states::WASHING,
            Stage::Rinsing => &states::RINSING,
            Stage::Spinning => &states::SPINNING,
            Stage::Draining => &states::DRAINING,
            Stage::Finished => &states::FINISHED,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Water or drum in use (Filling through Draining).
    pub fn is_running(self) -> bool {
        !matches!(self, Stage::Idle | Stage::Finished)
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-tick update handler.  Returns `Some(next)` to trigger a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Stage>;

/// Static descriptor for a single stage.  No heap, no `dyn`.
pub struct StateDescriptor {
    pub stage: Stage,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    current: Stage,
    /// Completed transitions since boot (wraps).
    transitions: u32,
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new()
    }
}

impl Fsm {
    pub const fn new() -> Self {
        Self {
            current: Stage::Idle,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for Idle.  Call once before the first
    /// `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in stage: {}", self.current);
        ctx.cycle = CycleContext::entered(ctx.now_ms);
        if let Some(enter) = self.current.descriptor().on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick.  `ctx.now_ms` must already hold this tick's time.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        if let Some(next) = (self.current.descriptor().on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    /// Jump straight to `next`, running the exit and entry actions.  No-op
    /// when already there.
    pub fn force_transition(&mut self, next: Stage, ctx: &mut FsmContext) {
        if next != self.current {
            self.transition(next, ctx);
        }
    }

    /// Back to Idle exactly as at cold start: the Idle entry action always
    /// runs, the per-stage context is reset and any unconsumed
    /// start/cancel event is discarded.
    pub fn reset(&mut self, ctx: &mut FsmContext) {
        if self.current != Stage::Idle {
            info!("FSM reset: {} -> Idle", self.current);
            if let Some(exit) = self.current.descriptor().on_exit {
                exit(ctx);
            }
            self.current = Stage::Idle;
            self.transitions = self.transitions.wrapping_add(1);
        }
        ctx.take_start_cancel();
        ctx.cycle = CycleContext::entered(ctx.now_ms);
        if let Some(enter) = states::IDLE.on_enter {
            enter(ctx);
        }
    }

    pub fn current_stage(&self) -> Stage {
        self.current
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    fn transition(&mut self, next: Stage, ctx: &mut FsmContext) {
        info!(
            "FSM transition: {} -> {} after {}ms",
            self.current,
            next,
            ctx.elapsed_in_stage()
        );

        if let Some(exit) = self.current.descriptor().on_exit {
            exit(ctx);
        }

        self.current = next;
        self.transitions = self.transitions.wrapping_add(1);
        ctx.cycle = CycleContext::entered(ctx.now_ms);

        if let Some(enter) = next.descriptor().on_enter {
            enter(ctx);
        }
    }
}
