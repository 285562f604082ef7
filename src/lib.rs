//! Flappy Sim - a flap-through-the-gaps arcade simulation core
//!
//! Core modules:
//! - `sim`: Simulation (tick gate, physics, obstacle pool, collisions, perception)
//! - `decision`: The pluggable agent that decides when to flap
//! - `render`: Drawable snapshot for an external presentation layer
//! - `platform`: Frame driver and browser bindings
//! - `config`: Construction-time parameters

pub mod config;
pub mod decision;
pub mod error;
pub mod platform;
pub mod render;
pub mod sim;

pub use config::SimConfig;
pub use decision::{ConstantDecision, DecisionAgent, Observation};
pub use error::{Result, SimError};
pub use render::RenderFrame;
pub use sim::{SimPhase, Simulation};

/// Default configuration constants
pub mod consts {
    /// Target simulation tick rate (ticks per second)
    pub const TICK_RATE: f64 = 60.0;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 640.0;
    pub const PLAYFIELD_HEIGHT: f32 = 480.0;

    /// Agent hitbox half-extent and fixed horizontal position
    pub const AGENT_RADIUS: f32 = 15.0;
    pub const AGENT_X: f32 = 40.0;
    pub const AGENT_START_Y: f32 = 240.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 250.0;
    /// Velocity removed per flap (pixels/s)
    pub const FLAP_IMPULSE: f32 = 100.0;

    /// Obstacle defaults
    pub const OBSTACLE_VELOCITY: f32 = 80.0; // leftward, pixels/s
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_SPACING: f32 = 200.0;
    pub const GAP_SIZE: f32 = 140.0;
    pub const GAP_MIN_CLEARANCE: f32 = 40.0;
    /// Slack past the left edge before recycling
    pub const RECYCLE_MARGIN: f32 = 2.0;

    /// Perception grid cell size (pixels)
    pub const CELL_SIZE: f32 = 20.0;
}
