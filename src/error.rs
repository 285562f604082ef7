//! Error types for simulation construction and metric lookup

use thiserror::Error;

/// Errors raised by the simulation core
///
/// All of these are construction-time or programming faults. Nothing that
/// happens inside a tick can fail once a [`crate::sim::Simulation`] exists.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("tick rate must be a positive, finite number of ticks per second (got {0})")]
    InvalidTickRate(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid metric name: '{name}'. Check for typos in your code.\nAvailable metrics: {valid}")]
    UnknownMetric { name: String, valid: String },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
