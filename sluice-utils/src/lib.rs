//! Shared math and position types for the sluice workspace.

pub mod direction;
pub mod math;
pub mod types;

pub use direction::{Cardinal, Direction};
pub use types::BlockPos;
