//! The finite liquid automaton.
//!
//! Liquids have levels `1..=7`, `7` being an inexhaustible source. A liquid
//! voxel is only ever looked at when one of its scheduled updates fires, see
//! [`spread::update_liquid`] for what an update does.

pub mod barrier;
pub mod collision;
pub mod flow_direction;
pub mod level;
pub mod pathfinder;
pub mod spread;
mod view;

pub use barrier::{barrier_height, blocks_passage, can_spread_into, level_fraction};
pub use collision::{is_different_collidable_liquid, replace_liquid, replacement_for};
pub use flow_direction::resolve_flow_direction;
pub use level::{is_source, max_neighbor_level, should_crystallize};
pub use pathfinder::{DownhillPath, PathScratch, find_downward_paths};
pub use spread::{UpdateContext, UpdateOutcome, update_liquid};
pub use view::FluidView;
