//! Simulation handle error types.

use thiserror::Error;

use super::messages::SimulationId;

/// Errors returned by a [`super::SimulationHandle`]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SimulationError {
    /// The actor has stopped and no longer accepts messages
    #[error("simulation {0} is closed")]
    Closed(SimulationId),

    /// The actor stopped before replying
    #[error("simulation {0} dropped the reply")]
    NoResponse(SimulationId),
}

/// Result type for simulation handle operations
pub type Result<T> = std::result::Result<T, SimulationError>;
