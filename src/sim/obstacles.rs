//! Obstacle pool
//!
//! A fixed number of slots is filled once per run and then reused: an
//! obstacle that scrolls off the left edge is moved to the back of the
//! stream instead of being dropped. Slot order says nothing about x order.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{GameEvent, Obstacle};
use crate::config::SimConfig;

/// Owns every obstacle in play
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    spacing: f32,
    playfield_width: f32,
    min_gap_y: f32,
    max_gap_y: f32,
    /// Center x below which the agent has passed an obstacle
    scoring_line: f32,
    /// Center x below which an obstacle is recycled
    recycle_line: f32,
    rng: Pcg32,
}

impl ObstacleField {
    /// Empty field; call [`ObstacleField::reset`] before advancing
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        Self {
            obstacles: Vec::with_capacity(config.buffered_obstacles()),
            spacing: config.obstacle_spacing,
            playfield_width: config.playfield_width,
            min_gap_y: config.min_gap_y(),
            max_gap_y: config.max_gap_y(),
            scoring_line: config.scoring_line(),
            recycle_line: config.recycle_line(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Allowed range of gap centers
    pub fn gap_range(&self) -> (f32, f32) {
        (self.min_gap_y, self.max_gap_y)
    }

    /// Refill the pool with `count` obstacles, `spacing` apart, starting at the right edge
    pub fn reset(&mut self, count: usize, spacing: f32) {
        self.spacing = spacing;
        self.obstacles.clear();
        self.obstacles.resize(
            count,
            Obstacle {
                x: 0.0,
                y: 0.0,
                scoreable: true,
            },
        );
        for slot in 0..count {
            self.spawn_at(slot, slot as f32 * spacing);
        }
        log::debug!("Obstacle pool reset: {count} slots, spacing {spacing}");
    }

    /// Place the obstacle in `slot` at `x_beyond_edge` past the right edge with a fresh gap
    ///
    /// An out-of-range slot is ignored without consuming a random draw.
    pub fn spawn_at(&mut self, slot: usize, x_beyond_edge: f32) {
        if !self.has_slot(slot) {
            return;
        }
        let x = self.playfield_width + x_beyond_edge;
        let y = self.random_gap_y();
        self.obstacles[slot] = Obstacle {
            x,
            y,
            scoreable: true,
        };
    }

    /// Greedy running max over the pool, starting from zero
    ///
    /// Later slots win ties.
    pub fn rightmost_x(&self) -> f32 {
        let mut rightmost = 0.0;
        for obstacle in &self.obstacles {
            if obstacle.x >= rightmost {
                rightmost = obstacle.x;
            }
        }
        rightmost
    }

    /// Move the obstacle in `slot` one spacing behind the current rightmost obstacle
    pub fn recycle(&mut self, slot: usize) {
        if !self.has_slot(slot) {
            return;
        }
        let x = self.rightmost_x() + self.spacing;
        let y = self.random_gap_y();
        self.obstacles[slot] = Obstacle {
            x,
            y,
            scoreable: true,
        };
    }

    /// Scroll every obstacle left by `velocity * dt`
    ///
    /// Pushes a [`GameEvent::Scored`] the first time an obstacle crosses the
    /// scoring line and a [`GameEvent::Recycled`] when one leaves the
    /// playfield. Returns the number of obstacles scored this call.
    pub fn advance(&mut self, dt: f32, velocity: f32, events: &mut Vec<GameEvent>) -> u32 {
        let mut scored = 0;
        for slot in 0..self.obstacles.len() {
            let obstacle = &mut self.obstacles[slot];
            obstacle.x -= velocity * dt;

            if obstacle.x < self.scoring_line && obstacle.scoreable {
                obstacle.scoreable = false;
                scored += 1;
                events.push(GameEvent::Scored { slot });
                log::debug!("Obstacle {slot} passed");
            }

            if obstacle.x < self.recycle_line {
                self.recycle(slot);
                events.push(GameEvent::Recycled { slot });
                log::debug!("Obstacle {slot} recycled to x={}", self.obstacles[slot].x);
            }
        }
        scored
    }

    /// Direct slot access for arranging test scenarios
    #[cfg(test)]
    pub(crate) fn slots_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    fn has_slot(&self, slot: usize) -> bool {
        if slot < self.obstacles.len() {
            return true;
        }
        log::warn!(
            "Ignoring obstacle slot {slot}; pool has {} slots",
            self.obstacles.len()
        );
        false
    }

    fn random_gap_y(&mut self) -> f32 {
        self.rng.random_range(self.min_gap_y..=self.max_gap_y)
    }
}
