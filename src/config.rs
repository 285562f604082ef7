//! Simulation configuration
//!
//! Fixed at construction. A host may load it from JSON; any missing key
//! falls back to the default playfield.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::collision::Rect;

/// Construction-time parameters for a simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Minimum real-time cadence of simulation ticks (ticks per second)
    pub tick_rate: f64,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Agent ===
    /// Half-extent of the agent's square hitbox
    pub agent_radius: f32,
    /// Fixed horizontal center of the agent
    pub agent_x: f32,
    /// Vertical center the agent is reset to on (re)start
    pub agent_start_y: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Upward velocity subtracted per flap (pixels/s)
    pub impulse: f32,

    // === Obstacles ===
    /// Leftward obstacle speed (pixels/s)
    pub obstacle_velocity: f32,
    pub obstacle_width: f32,
    /// Horizontal distance between consecutive obstacle centers
    pub obstacle_spacing: f32,
    /// Height of the passage gap
    pub gap_size: f32,
    /// Minimum height of both the top and bottom segments
    pub min_clearance: f32,
    /// Extra distance past the left edge before an obstacle is recycled
    pub recycle_margin: f32,

    // === Perception ===
    /// Side length of one perception grid cell
    pub cell_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            agent_radius: AGENT_RADIUS,
            agent_x: AGENT_X,
            agent_start_y: AGENT_START_Y,
            gravity: GRAVITY,
            impulse: FLAP_IMPULSE,

            obstacle_velocity: OBSTACLE_VELOCITY,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_spacing: OBSTACLE_SPACING,
            gap_size: GAP_SIZE,
            min_clearance: GAP_MIN_CLEARANCE,
            recycle_margin: RECYCLE_MARGIN,

            cell_size: CELL_SIZE,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(SimError::InvalidTickRate(self.tick_rate));
        }

        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("agent_radius", self.agent_radius),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_spacing", self.obstacle_spacing),
            ("gap_size", self.gap_size),
            ("cell_size", self.cell_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive (got {value})"
                )));
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("impulse", self.impulse),
            ("obstacle_velocity", self.obstacle_velocity),
            ("min_clearance", self.min_clearance),
            ("recycle_margin", self.recycle_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be non-negative (got {value})"
                )));
            }
        }

        if self.min_gap_y() > self.max_gap_y() {
            return Err(SimError::InvalidConfig(format!(
                "gap_size {} with min_clearance {} does not fit a playfield {} high",
                self.gap_size, self.min_clearance, self.playfield_height
            )));
        }

        if self.cell_size > self.playfield_width || self.cell_size > self.playfield_height {
            return Err(SimError::InvalidConfig(format!(
                "cell_size {} is larger than the playfield",
                self.cell_size
            )));
        }

        Ok(())
    }

    /// Number of obstacles kept in the pool
    pub fn buffered_obstacles(&self) -> usize {
        (self.playfield_width / self.obstacle_spacing).ceil() as usize + 2
    }

    /// Lowest allowed gap center
    pub fn min_gap_y(&self) -> f32 {
        self.min_clearance + self.gap_size / 2.0
    }

    /// Highest allowed gap center
    pub fn max_gap_y(&self) -> f32 {
        self.playfield_height - self.min_clearance - self.gap_size / 2.0
    }

    pub fn grid_columns(&self) -> usize {
        (self.playfield_width / self.cell_size).floor() as usize
    }

    pub fn grid_rows(&self) -> usize {
        (self.playfield_height / self.cell_size).floor() as usize
    }

    /// Hitbox of the agent centered at the given height
    pub fn agent_rect(&self, y: f32) -> Rect {
        Rect::new(
            self.agent_x - self.agent_radius,
            y - self.agent_radius,
            2.0 * self.agent_radius,
            2.0 * self.agent_radius,
        )
    }

    /// Obstacles whose center is left of this line have been passed by the agent
    pub fn scoring_line(&self) -> f32 {
        self.agent_x - self.agent_radius - self.obstacle_width / 2.0
    }

    /// Obstacles whose center is left of this line are recycled
    pub fn recycle_line(&self) -> f32 {
        -self.obstacle_width / 2.0 - self.recycle_margin
    }
}
