//! Tick gate
//!
//! The host calls in on every animation frame with a wall-clock timestamp.
//! The gate turns that stream into simulation ticks no closer together than
//! `1 / tick_rate` seconds, reporting the real elapsed time of each.

use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct TickGate {
    tick_rate: f64,
    /// Timestamp (ms) of the last accepted tick; `None` until the first poll
    last_tick: Option<f64>,
}

impl TickGate {
    pub fn new(tick_rate: f64) -> Result<Self> {
        if !(tick_rate.is_finite() && tick_rate > 0.0) {
            return Err(SimError::InvalidTickRate(tick_rate));
        }
        Ok(Self {
            tick_rate,
            last_tick: None,
        })
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Minimum seconds between ticks
    pub fn interval(&self) -> f64 {
        1.0 / self.tick_rate
    }

    pub fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }

    /// Offer a frame at `now_millis`
    ///
    /// Returns the elapsed seconds since the last accepted tick when enough
    /// time has passed, otherwise `None` without touching the baseline. The
    /// very first poll only records the baseline.
    pub fn poll(&mut self, now_millis: f64) -> Option<f32> {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now_millis);
            return None;
        };

        let elapsed = (now_millis - last) / 1000.0;
        if elapsed >= self.interval() {
            self.last_tick = Some(now_millis);
            Some(elapsed as f32)
        } else {
            None
        }
    }
}
