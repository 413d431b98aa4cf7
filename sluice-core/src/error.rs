use sluice_utils::BlockPos;
use thiserror::Error;

/// Errors returned by [`crate::LiquidSimulation`] edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// No liquid is registered under this code.
    #[error("unknown liquid `{0}`")]
    UnknownLiquid(String),
    /// Liquid levels are `1..=7`.
    #[error("liquid level {0} is out of range")]
    InvalidLevel(u8),
    /// The position is outside the world.
    #[error("{0} is outside the world")]
    OutOfBounds(BlockPos),
}
