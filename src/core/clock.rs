//! Injected monotonic simulation clock

use super::types::Millis;

/// Accumulates frame deltas into a monotonic millisecond timestamp.
///
/// The clock never reads wall time. Drivers feed it `dt` and every system
/// compares its deadlines against the value it returns, which keeps a run
/// reproducible for a given sequence of deltas.
#[derive(Debug, Clone)]
pub struct SimClock {
    elapsed_secs: f64,
    max_dt: f32,
}

impl SimClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            elapsed_secs: 0.0,
            max_dt: if max_dt.is_finite() && max_dt > 0.0 { max_dt } else { f32::MAX },
        }
    }

    /// Clamp a raw frame delta: non-finite and negative values contribute nothing.
    pub fn sanitize(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            0.0
        } else {
            dt.min(self.max_dt)
        }
    }

    /// Advance by `dt` seconds and return the sanitized delta and the new `now`.
    pub fn advance(&mut self, dt: f32) -> (f32, Millis) {
        let dt = self.sanitize(dt);
        self.elapsed_secs += dt as f64;
        (dt, self.now())
    }

    /// Whole milliseconds elapsed. Rounded at microsecond precision first so
    /// f32 deltas like 0.02 do not truncate to 19.
    pub fn now(&self) -> Millis {
        ((self.elapsed_secs * 1_000_000.0).round() as u64) / 1000
    }

    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}
