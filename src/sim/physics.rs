//! Vertical agent physics
//!
//! Semi-implicit Euler: velocity is updated before position.

use super::state::Agent;

/// Integrate one step of gravity
#[inline]
pub fn apply_gravity(agent: &mut Agent, gravity: f32, dt: f32) {
    agent.y_velocity += gravity * dt;
    agent.y += agent.y_velocity * dt;
}

/// Flap: knock `impulse` off the current velocity
///
/// This subtracts rather than sets, so repeated flaps compound against
/// whatever downward speed the agent already has.
#[inline]
pub fn apply_impulse(agent: &mut Agent, impulse: f32) {
    agent.y_velocity -= impulse;
}
