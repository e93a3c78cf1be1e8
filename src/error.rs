//! Error types for the route sequencer.

use thiserror::Error;

/// Reasons a sequencing request is rejected before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidInput {
    #[error("at least 2 stops are required for route sequencing, got {count}")]
    TooFewStops { count: usize },
    #[error("{count} stops exceeds the configured limit of {max}")]
    TooManyStops { count: usize, max: usize },
    #[error("average speed must be a positive number of km/h, got {speed}")]
    InvalidSpeed { speed: f64 },
    #[error("vehicle count must be at least 1")]
    NoVehicles,
    #[error("number of stops ({stops}) must be greater than or equal to number of vehicles ({vehicles})")]
    MoreVehiclesThanStops { stops: usize, vehicles: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}
