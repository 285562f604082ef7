//! Decision agents
//!
//! The simulation asks an agent once per tick whether to flap. It only ever
//! looks at the returned bool, never at the agent's internals.

use crate::sim::PerceptionGrid;

/// Everything a decision agent sees on one tick
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Vertical center of the agent (0 = top, grows downward)
    pub agent_y: f32,
    /// Vertical velocity; positive means falling
    pub agent_y_velocity: f32,
    /// Occupancy of obstacles still ahead of the agent
    pub grid: &'a PerceptionGrid,
    /// Seconds survived so far in this run
    pub time_survived: f64,
}

/// Chooses whether to flap on a tick
pub trait DecisionAgent {
    /// Identifier for logs
    fn kind(&self) -> &'static str;

    /// Return true to flap this tick
    fn decide(&mut self, obs: &Observation<'_>) -> bool;
}

/// Gives the same answer every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantDecision(pub bool);

impl Default for ConstantDecision {
    /// Always flap
    fn default() -> Self {
        Self(true)
    }
}

impl DecisionAgent for ConstantDecision {
    fn kind(&self) -> &'static str {
        if self.0 { "always-flap" } else { "never-flap" }
    }

    fn decide(&mut self, _obs: &Observation<'_>) -> bool {
        self.0
    }
}

impl<F> DecisionAgent for F
where
    F: FnMut(&Observation<'_>) -> bool,
{
    fn kind(&self) -> &'static str {
        "closure"
    }

    fn decide(&mut self, obs: &Observation<'_>) -> bool {
        self(obs)
    }
}
