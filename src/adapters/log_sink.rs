//! Log-based adapters.
//!
//! [`LogEventSink`] implements [`EventSink`] by writing structured
//! application events to the logger (UART / USB-CDC in production).
//! [`LogDisplay`] implements [`DisplayPort`] the same way, standing in for
//! the character LCD.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{DisplayPort, EventSink};
use crate::display::Frame;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {json}"),
                Err(e) => warn!("TELEM | encode failed: {e}"),
            },
            AppEvent::StageChanged { from, to } => {
                info!("STAGE | {from} -> {to}");
            }
            AppEvent::StartCancel { stage } => {
                info!("KEY   | start/cancel in {stage}");
            }
            AppEvent::Locked { from } => {
                warn!("GATE  | locked, cycle aborted from {from}");
            }
            AppEvent::Armed => {
                info!("GATE  | armed");
            }
            AppEvent::Started(stage) => {
                info!("START | initial_stage={stage}");
            }
        }
    }
}

/// Prints each frame as four bordered lines.
#[derive(Debug, Default)]
pub struct LogDisplay {
    frames: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames painted since boot.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl DisplayPort for LogDisplay {
    fn render(&mut self, frame: &Frame) {
        self.frames = self.frames.wrapping_add(1);
        for line in &frame.lines {
            info!("LCD   |{:<20}|", line.as_str());
        }
    }
}
