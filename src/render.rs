//! Render snapshot
//!
//! Everything a presentation layer needs to draw one frame, detached from
//! the simulation's internals. Drawing itself is the host's job.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::sim::collision::Rect;
use crate::sim::{Metrics, PerceptionGrid, SimPhase, Simulation};

/// One colored rectangle, laid out for an instanced GPU draw
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    pub fn new(rect: &Rect, color: [f32; 4]) -> Self {
        Self {
            position: rect.pos.to_array(),
            size: rect.size.to_array(),
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const AGENT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const OBSTACLE_TOP: [f32; 4] = [1.0, 0.5, 1.0, 1.0];
    pub const OBSTACLE_BOTTOM: [f32; 4] = [1.0, 1.0, 0.5, 1.0];
    pub const CELL_OCCUPIED: [f32; 4] = [1.0, 0.5, 0.5, 0.25];
    pub const BANNER_START: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const BANNER_GAME_OVER: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}

/// Top and bottom segments of one obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleSegments {
    pub top: Rect,
    pub bottom: Rect,
}

/// Full drawable state for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub phase: SimPhase,
    pub playfield: [f32; 2],
    pub cell_size: f32,
    pub agent: Rect,
    pub obstacles: Vec<ObstacleSegments>,
    pub grid: PerceptionGrid,
    pub metrics: Metrics,
}

impl RenderFrame {
    pub fn capture(sim: &Simulation) -> Self {
        let config = sim.config();
        Self {
            phase: sim.phase(),
            playfield: [config.playfield_width, config.playfield_height],
            cell_size: config.cell_size,
            agent: sim.agent_rect(),
            obstacles: sim
                .obstacles()
                .iter()
                .map(|o| ObstacleSegments {
                    top: o.top_segment(config),
                    bottom: o.bottom_segment(config),
                })
                .collect(),
            grid: sim.grid().clone(),
            metrics: sim.metrics().clone(),
        }
    }

    /// Overlay text for the current phase
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            SimPhase::NotStarted => Some("Press Space to Play"),
            SimPhase::Running => None,
            SimPhase::GameOver => Some("Game Over"),
        }
    }

    pub fn banner_color(&self) -> [f32; 4] {
        match self.phase {
            SimPhase::GameOver => colors::BANNER_GAME_OVER,
            _ => colors::BANNER_START,
        }
    }

    /// Instance list in draw order: perception overlay, obstacles, agent
    pub fn instances(&self) -> Vec<RectInstance> {
        let mut out = Vec::with_capacity(
            self.grid.occupied_count() + self.obstacles.len() * 2 + 1,
        );

        // The overlay is only meaningful while a run is live
        if self.phase == SimPhase::Running {
            for (column, row) in self.grid.occupied() {
                let cell = self.grid.cell_rect(column, row, self.cell_size);
                out.push(RectInstance::new(&cell, colors::CELL_OCCUPIED));
            }
        }

        for segments in &self.obstacles {
            out.push(RectInstance::new(&segments.top, colors::OBSTACLE_TOP));
            out.push(RectInstance::new(&segments.bottom, colors::OBSTACLE_BOTTOM));
        }

        out.push(RectInstance::new(&self.agent, colors::AGENT));
        out
    }
}
