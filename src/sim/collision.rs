//! Axis-aligned rectangle collision
//!
//! Everything in the playfield is a box: the agent's hitbox, the top and
//! bottom segments of every obstacle, and every perception cell. Boundaries
//! are inclusive, so rectangles that only share an edge still collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and extent
///
/// Screen coordinates: y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle spanning two opposite corners
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self {
            pos: min,
            size: max - min,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Corners in clockwise order starting top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.pos,
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left(), self.bottom()),
        ]
    }

    /// Point containment with inclusive edges
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Inclusive overlap of the horizontal extents
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() <= other.right() && other.left() <= self.right()
    }

    /// Inclusive overlap of the vertical extents
    #[inline]
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() <= other.bottom() && other.top() <= self.bottom()
    }

    /// Whether this rectangle's vertical extent lies inside `outer`'s (edges may touch)
    #[inline]
    pub fn within_y(&self, outer: &Rect) -> bool {
        self.top() >= outer.top() && self.bottom() <= outer.bottom()
    }
}

/// Inclusive rectangle overlap test
///
/// Two rectangles collide when their extents overlap on both axes. This also
/// catches cross-shaped intersections where neither rectangle has a corner
/// inside the other, which a corner-containment test misses.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.overlaps_x(b) && a.overlaps_y(b)
}

/// Corner-containment test: true iff a corner of either rectangle lies inside the other
///
/// Kept for comparison against [`overlaps`]; it agrees everywhere except on
/// cross-shaped intersections.
pub fn corners_overlap(a: &Rect, b: &Rect) -> bool {
    b.corners().iter().any(|&c| a.contains_point(c))
        || a.corners().iter().any(|&c| b.contains_point(c))
}
