//! Integration tests for the access gate, the START/CANCEL key and the
//! service's event stream.

use washer::app::events::AppEvent;
use washer::display::Frame;
use washer::drivers::status_led::StatusLights;
use washer::drivers::stepper::StepperMode;
use washer::fsm::Stage;

use super::mock_hw::{ActuatorCall, Bench};

fn presses(b: &Bench) -> usize {
    b.sink.count(|e| matches!(e, AppEvent::StartCancel { .. }))
}

fn locked_frames(b: &Bench) -> usize {
    b.display
        .frames
        .iter()
        .filter(|(_, f)| *f == Frame::locked())
        .count()
}

// ── Access gate ───────────────────────────────────────────────

#[test]
fn boots_locked_until_armed() {
    let mut b = Bench::new();
    b.hw.armed = false;
    b.run_ms(500);

    assert_eq!(b.app.stage(), Stage::Idle);
    assert!(!b.app.is_armed());
    assert_eq!(b.hw.status, StatusLights::locked());
    assert_eq!(locked_frames(&b), 1, "locked notice painted once");
    assert!(b.hw.quiet());

    b.hw.armed = true;
    b.tick();
    assert!(b.app.is_armed());
    assert_eq!(b.hw.status, StatusLights::armed(false));
    assert_eq!(b.sink.events.last(), Some(&AppEvent::Armed));
    assert_eq!(
        b.display.frames.last().map(|(_, f)| f),
        Some(&Frame::compose(Stage::Idle, false)),
        "screen repainted right after re-arm"
    );
}

#[test]
fn disarm_quiesces_every_stage_in_one_tick() {
    for target in Stage::ALL {
        let mut b = Bench::new();
        let limit = u64::from(b.config().cycle_ms()) + 100;
        b.run_ms(10);
        if target != Stage::Idle {
            b.hw.key = true;
            b.run_until(Stage::Filling, 1_000).expect("press");
            b.hw.key = false;
            if target != Stage::Filling {
                b.run_until(target, limit).expect("stage reached");
            }
        }
        // Let the stage's own screen land so the notice is not throttled.
        b.run_ms(2 * u64::from(b.config().display_refresh_ms));

        b.hw.armed = false;
        b.tick();

        assert_eq!(b.app.stage(), Stage::Idle, "from {target:?}");
        assert!(b.hw.quiet(), "outputs on after disarm from {target:?}");
        assert_eq!(b.app.stepper().mode(), StepperMode::Stopped);
        assert_eq!(b.hw.status, StatusLights::locked());
        assert_eq!(
            b.sink.events.last(),
            Some(&AppEvent::Locked { from: target })
        );
        assert_eq!(b.display.frames.last().map(|(_, f)| f), Some(&Frame::locked()));
    }
}

#[test]
fn locked_tick_forces_all_off_every_time() {
    let mut b = Bench::new();
    b.hw.armed = false;
    b.run_ms(3);
    let all_off = b
        .hw
        .calls
        .iter()
        .filter(|c| **c == ActuatorCall::AllOff)
        .count();
    assert_eq!(all_off, 3);
}

#[test]
fn press_while_locked_is_ignored() {
    let mut b = Bench::new();
    b.hw.armed = false;
    b.press();
    b.press();
    assert_eq!(b.app.stage(), Stage::Idle);
    assert_eq!(presses(&b), 0);
    assert!(!b.hw.inlet);
}

#[test]
fn rearm_resumes_from_idle_like_cold_start() {
    let mut b = Bench::new();
    let cfg = b.config();
    b.run_ms(10);
    b.press();
    b.run_until(Stage::Washing, u64::from(cfg.fill_ms)).expect("washing");
    b.run_ms(u64::from(cfg.display_refresh_ms));

    b.hw.armed = false;
    b.run_ms(50);

    // Key already held when the gate releases: must be released first.
    b.hw.key = true;
    b.hw.armed = true;
    b.run_ms(1_000);
    assert_eq!(b.app.stage(), Stage::Idle);
    assert!(b.hw.quiet());

    b.hw.key = false;
    b.run_ms(200);
    b.press();
    assert_eq!(b.app.stage(), Stage::Filling);
    assert_eq!(locked_frames(&b), 1);
}

#[test]
fn second_lockout_paints_notice_again() {
    let mut b = Bench::new();
    let hold = u64::from(b.config().display_refresh_ms) + 100;
    for _ in 0..2 {
        b.hw.armed = false;
        b.run_ms(hold);
        b.hw.armed = true;
        b.run_ms(hold);
    }
    assert_eq!(locked_frames(&b), 2);
}

#[test]
fn gate_chatter_cannot_outpace_refresh() {
    let mut b = Bench::new();
    let refresh = b.config().display_refresh_ms;
    b.run_ms(300);

    for n in 0..20 {
        b.hw.armed = n % 2 == 1;
        b.run_ms(20);
    }
    b.run_ms(u64::from(refresh));

    let frames = &b.display.frames;
    assert!(frames.len() >= 2);
    for pair in frames.windows(2) {
        let (t0, _) = &pair[0];
        let (t1, _) = &pair[1];
        assert!(
            t1.wrapping_sub(*t0) >= refresh,
            "repaint {t0} -> {t1} inside refresh window"
        );
    }
    assert_eq!(
        frames.last().map(|(_, f)| f),
        Some(&Frame::compose(Stage::Idle, false))
    );
    assert!(b.app.is_armed());
}

// ── START / CANCEL key ────────────────────────────────────────

#[test]
fn held_key_yields_one_event() {
    let mut b = Bench::new();
    b.run_ms(10);
    b.hw.key = true;
    b.run_ms(5_000);
    b.hw.key = false;
    b.run_ms(500);

    assert_eq!(presses(&b), 1);
    assert_eq!(b.app.stage(), Stage::Filling, "held key must not cancel");
}

#[test]
fn presses_inside_debounce_window_collapse() {
    let mut b = Bench::new();
    b.run_ms(10);
    b.hw.key = true;
    b.run_ms(200);
    b.hw.key = false;
    b.run_ms(100);
    b.hw.key = true;
    b.run_ms(200);
    b.hw.key = false;
    b.run_ms(300);

    assert_eq!(presses(&b), 1);
    assert_eq!(b.app.stage(), Stage::Filling);
}

#[test]
fn contact_bounce_alone_never_fires() {
    let mut b = Bench::new();
    b.run_ms(10);
    for n in 0..20 {
        b.hw.key = n % 2 == 0;
        b.run_ms(30);
    }
    b.hw.key = false;
    b.run_ms(500);
    assert_eq!(presses(&b), 0);
    assert_eq!(b.app.stage(), Stage::Idle);
}

#[test]
fn same_key_cancels_a_running_cycle() {
    let mut b = Bench::new();
    let cfg = b.config();
    b.run_ms(10);
    b.press();
    b.run_until(Stage::Rinsing, u64::from(cfg.fill_ms + cfg.wash_ms))
        .expect("rinsing");

    b.press();
    assert_eq!(b.app.stage(), Stage::Idle);
    assert!(b.hw.quiet());
    assert_eq!(b.hw.status, StatusLights::armed(false));
    assert!(b.sink.events.contains(&AppEvent::StartCancel { stage: Stage::Rinsing }));
    assert!(b.sink.events.contains(&AppEvent::StageChanged {
        from: Stage::Rinsing,
        to: Stage::Idle
    }));
}

#[test]
fn press_on_finished_screen_returns_to_idle_only() {
    let mut b = Bench::new();
    let cfg = b.config();
    b.run_ms(10);
    b.press();
    b.run_until(Stage::Finished, u64::from(cfg.cycle_ms()))
        .expect("finished");

    b.press();
    assert_eq!(b.app.stage(), Stage::Idle);
    b.run_ms(2_000);
    assert_eq!(b.app.stage(), Stage::Idle, "acknowledge must not restart");
}

// ── Event stream ──────────────────────────────────────────────

#[test]
fn event_stream_starts_with_started_then_armed() {
    let mut b = Bench::new();
    b.run_ms(1);
    assert_eq!(
        b.sink.events,
        vec![AppEvent::Started(Stage::Idle), AppEvent::Armed]
    );
}
