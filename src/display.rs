//! Text content for the 20x4 character display, and repaint throttling.
//!
//! A [`Frame`] is a pure function of the stage and the wash direction.
//! The display driver itself lives behind [`DisplayPort`](crate::app::ports::DisplayPort).

use core::fmt::Write;

use heapless::String;

use crate::fsm::Stage;
use crate::pins::{LCD_COLS, LCD_ROWS};
use crate::timing::{Millis, has_elapsed};

pub type Line = String<LCD_COLS>;

/// Build a line, silently truncating past the display width.
fn line(text: &str) -> Line {
    let mut out = Line::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: [Line; LCD_ROWS],
}

impl Frame {
    pub fn new(rows: [&str; LCD_ROWS]) -> Self {
        Self {
            lines: rows.map(line),
        }
    }

    /// Shown once while the access gate is locked.
    pub fn locked() -> Self {
        Self::new(["   SYSTEM LOCKED", "", "Scan card to arm", ""])
    }

    /// Screen for `stage`.  `wash_forward` only matters while washing.
    pub fn compose(stage: Stage, wash_forward: bool) -> Self {
        let mut title = Line::new();
        // Longest name is 8 chars; "Stage: " + 8 fits in 20.
        let _ = write!(title, "Stage: {}", stage.name());

        let rows = match stage {
            Stage::Idle => ["Ready", "Press START", ""],
            Stage::Filling => ["Inlet: OPEN", "Drum: stopped", "START = cancel"],
            Stage::Washing if wash_forward => ["Agitating", "Drum: forward", "START = cancel"],
            Stage::Washing => ["Agitating", "Drum: reverse", "START = cancel"],
            Stage::Rinsing => ["Rinsing clothes", "Drum: slow", "START = cancel"],
            Stage::Spinning => ["Spinning dry", "Drum: fast", "START = cancel"],
            Stage::Draining => ["Drain: OPEN", "Drum: stopped", "START = cancel"],
            Stage::Finished => ["Cycle complete", "Press START", ""],
        };

        Self {
            lines: [title, line(rows[0]), line(rows[1]), line(rows[2])],
        }
    }
}

/// Rate limiter for repaints: a frame is pushed only when its content
/// differs from what is on screen and at least `interval_ms` has passed
/// since the previous repaint.  Every frame goes through here, the locked
/// notice included, so no path can repaint faster than the interval.
#[derive(Debug)]
pub struct Refresh {
    interval_ms: Millis,
    shown: Option<Frame>,
    /// `None` until the first repaint.
    last_render_at: Option<Millis>,
}

impl Refresh {
    pub fn new(interval_ms: Millis) -> Self {
        Self {
            interval_ms,
            shown: None,
            last_render_at: None,
        }
    }

    /// `true` if `frame` should be painted now.  Records it as shown.
    ///
    /// A refused frame is not remembered; the caller offers the current
    /// frame again next tick and it paints once the window has passed.
    pub fn should_render(&mut self, frame: &Frame, now_ms: Millis) -> bool {
        if self.shown.as_ref() == Some(frame) {
            return false;
        }
        let throttled = self
            .last_render_at
            .is_some_and(|last| !has_elapsed(now_ms, last, self.interval_ms));
        if throttled {
            return false;
        }
        self.shown = Some(frame.clone());
        self.last_render_at = Some(now_ms);
        true
    }
}
