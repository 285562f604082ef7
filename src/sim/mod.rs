//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Gated ticks with measured elapsed time
//! - Seeded RNG only
//! - Fixed-size obstacle pool, slots reused in place
//! - No rendering or platform dependencies

pub mod collision;
pub mod metrics;
pub mod obstacles;
pub mod perception;
pub mod physics;
pub mod state;
pub mod tick;
pub mod timing;

pub use collision::{Rect, corners_overlap, overlaps};
pub use metrics::{MetricKey, Metrics};
pub use obstacles::ObstacleField;
pub use perception::PerceptionGrid;
pub use physics::{apply_gravity, apply_impulse};
pub use state::{Agent, GameEvent, HitKind, Obstacle, SimPhase};
pub use tick::Simulation;
pub use timing::TickGate;
