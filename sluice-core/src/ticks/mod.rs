//! Debounced scheduled updates for liquid voxels.
//!
//! Every disturbance of a liquid voxel ends up here as a request to update
//! that position after the liquid's spread delay. At most one update is ever
//! pending per position: scheduling again replaces the pending one.
//!
//! # Architecture
//!
//! - [`ScheduledTick`] - A single scheduled update
//! - [`TickScheduler`] - The time-ordered queue with per-position debounce

mod scheduled_tick;
mod scheduler;

pub use scheduled_tick::ScheduledTick;
pub use scheduler::TickScheduler;
