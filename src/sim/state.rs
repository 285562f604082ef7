//! Simulation entity types
//!
//! Plain data owned by [`super::Simulation`]; behavior lives in the
//! physics, obstacle and tick modules.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::SimConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimPhase {
    /// Waiting for the first activation
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended by a collision; the next activation restarts
    GameOver,
}

/// What the agent ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Ceiling,
    Floor,
    Bar,
}

/// Notable things that happened during a tick (for hosts: sound, UI flashes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began (first start or restart)
    Started,
    /// The agent flapped
    Flap,
    /// The agent passed the obstacle in this slot
    Scored { slot: usize },
    /// The obstacle in this slot was moved back to the end of the stream
    Recycled { slot: usize },
    /// The run ended
    Collision { kind: HitKind },
}

/// The controlled agent
///
/// `y` is the vertical center in playfield pixels (0 = top), `y_velocity`
/// is in pixels/second with positive pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub y: f32,
    pub y_velocity: f32,
}

impl Agent {
    pub fn new(y: f32) -> Self {
        Self { y, y_velocity: 0.0 }
    }
}

/// A gapped obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Horizontal center of the obstacle's thickness
    pub x: f32,
    /// Vertical center of the passage gap
    pub y: f32,
    /// True until the agent has passed this obstacle
    pub scoreable: bool,
}

impl Obstacle {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Horizontal footprint `[x - width/2, x + width/2]`
    pub fn footprint(&self, width: f32) -> (f32, f32) {
        (self.x - width / 2.0, self.x + width / 2.0)
    }

    /// Solid segment from the playfield top down to the gap
    pub fn top_segment(&self, config: &SimConfig) -> Rect {
        let (left, _) = self.footprint(config.obstacle_width);
        Rect::new(
            left,
            0.0,
            config.obstacle_width,
            self.y - config.gap_size / 2.0,
        )
    }

    /// Solid segment from the gap down to the playfield bottom
    pub fn bottom_segment(&self, config: &SimConfig) -> Rect {
        let (left, _) = self.footprint(config.obstacle_width);
        let top = self.y + config.gap_size / 2.0;
        Rect::new(
            left,
            top,
            config.obstacle_width,
            config.playfield_height - top,
        )
    }

    /// The open passage between the two segments
    pub fn gap(&self, config: &SimConfig) -> Rect {
        let half = Vec2::new(config.obstacle_width, config.gap_size) / 2.0;
        Rect::from_corners(self.center() - half, self.center() + half)
    }
}
