use serde::{Deserialize, Serialize};

/// Monotonic simulation clock in milliseconds.
///
/// Advanced only by [`SimClock::advance`]; every deadline in the simulation
/// (invulnerability, delayed respawns, level advance) is compared against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    now_ms: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative and non-finite steps are ignored so
    /// the clock never runs backwards.
    pub fn advance(&mut self, dt: f32) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.now_ms += f64::from(dt) * 1000.0;
        }
        self.now_ms
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Elapsed time in seconds, for periodic motion.
    pub fn now_secs(&self) -> f64 {
        self.now_ms / 1000.0
    }
}
