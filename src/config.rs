//! Cycle configuration parameters
//!
//! All tunable parameters for the wash cycle.  Values are fixed for the
//! lifetime of the firmware image: defaults below, optionally overridden
//! by a JSON document baked in at build time (see `main.rs`).

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timing::{Micros, Millis};

/// Core cycle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    // --- Stage budgets ---
    /// Inlet valve open time (milliseconds)
    pub fill_ms: Millis,
    /// Agitation time (milliseconds)
    pub wash_ms: Millis,
    /// Rinse time (milliseconds)
    pub rinse_ms: Millis,
    /// Spin time (milliseconds)
    pub spin_ms: Millis,
    /// Drain valve open time (milliseconds)
    pub drain_ms: Millis,
    /// How long the "finished" screen stays up before returning to idle
    pub finished_hold_ms: Millis,

    // --- Drum motion ---
    /// Agitation sub-phase: the drum reverses direction this often while washing
    pub agitate_ms: Millis,
    /// Inter-step interval while washing (microseconds)
    pub wash_step_interval_us: Micros,
    /// Inter-step interval while rinsing, slower than washing
    pub rinse_step_interval_us: Micros,
    /// Inter-step interval while spinning, faster than washing
    pub spin_step_interval_us: Micros,

    // --- Input / output timing ---
    /// Minimum stable time before a key level change is trusted
    pub debounce_ms: Millis,
    /// Minimum time between display repaints
    pub display_refresh_ms: Millis,
    /// Telemetry report interval
    pub telemetry_interval_ms: Millis,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            // Stage budgets
            fill_ms: 10_000,
            wash_ms: 30_000,
            rinse_ms: 15_000,
            spin_ms: 12_000,
            drain_ms: 10_000,
            finished_hold_ms: 5_000,

            // Drum motion
            agitate_ms: 3_000,
            wash_step_interval_us: 2_000,
            rinse_step_interval_us: 4_000,
            spin_step_interval_us: 1_200,

            // I/O timing
            debounce_ms: 150,
            display_refresh_ms: 200,
            telemetry_interval_ms: 5_000,
        }
    }
}

impl CycleConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budgets = [
            (self.fill_ms, "fill_ms must be > 0"),
            (self.wash_ms, "wash_ms must be > 0"),
            (self.rinse_ms, "rinse_ms must be > 0"),
            (self.spin_ms, "spin_ms must be > 0"),
            (self.drain_ms, "drain_ms must be > 0"),
            (self.finished_hold_ms, "finished_hold_ms must be > 0"),
            (self.agitate_ms, "agitate_ms must be > 0"),
            (self.spin_step_interval_us, "spin_step_interval_us must be > 0"),
            (self.display_refresh_ms, "display_refresh_ms must be > 0"),
            (self.telemetry_interval_ms, "telemetry_interval_ms must be > 0"),
        ];
        if let Some((_, msg)) = budgets.iter().find(|(v, _)| *v == 0) {
            return Err(ConfigError::ValidationFailed(*msg));
        }

        if self.agitate_ms >= self.wash_ms {
            return Err(ConfigError::ValidationFailed(
                "agitate_ms must be shorter than wash_ms",
            ));
        }
        if self.spin_step_interval_us >= self.wash_step_interval_us {
            return Err(ConfigError::ValidationFailed(
                "spin must step faster than wash",
            ));
        }
        if self.rinse_step_interval_us <= self.wash_step_interval_us {
            return Err(ConfigError::ValidationFailed(
                "rinse must step slower than wash",
            ));
        }
        if self.debounce_ms == 0 || self.debounce_ms >= 1_000 {
            return Err(ConfigError::ValidationFailed(
                "debounce_ms must be within 1..1000",
            ));
        }
        Ok(())
    }

    /// Parse a JSON override and validate it.  Missing fields keep their
    /// default values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Pick the configuration for this image: the override if present and
    /// valid, defaults otherwise.  A rejected override is logged, never fatal.
    pub fn resolve(override_json: Option<&str>) -> Self {
        let Some(text) = override_json else {
            return Self::default();
        };
        match Self::from_json(text) {
            Ok(config) => {
                info!("Config override applied: cycle {}ms", config.cycle_ms());
                config
            }
            Err(e) => {
                warn!("Config override rejected ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Sum of every stage budget from `Filling` through `Draining`.
    pub fn cycle_ms(&self) -> Millis {
        self.fill_ms
            .saturating_add(self.wash_ms)
            .saturating_add(self.rinse_ms)
            .saturating_add(self.spin_ms)
            .saturating_add(self.drain_ms)
    }
}
