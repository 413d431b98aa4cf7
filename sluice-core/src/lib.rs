//! # Sluice core
//!
//! A finite, level-based liquid automaton for voxel worlds.
//!
//! Liquids live in the fluid layer of a voxel world owned by someone else
//! ([`world::VoxelWorld`]). Nothing is swept per tick: a voxel only updates
//! when something disturbed it, after its liquid's spread delay, through the
//! debounced [`ticks::TickScheduler`]. [`LiquidSimulation`] ties the two
//! together and is the single owner of all liquid mutation.

pub mod config;
pub mod effects;
mod error;
pub mod fluid;
pub mod simulation;
pub mod ticks;
pub mod world;

pub use config::{ConfigError, SimulationConfig};
pub use effects::{LiquidEffects, LogEffects, NoEffects, ParticleBurst, RecordedEffects};
pub use error::SimulationError;
pub use simulation::{LiquidSimulation, SimulationStats};
pub use world::{Layer, MemoryWorld, VoxelRead, VoxelWorld};
