//! # Sluice registry
//!
//! The block type capability table. Every voxel type the liquid automaton can
//! meet is described here once: how easily it is replaced, how high a barrier
//! each face puts up against liquid, and, for liquid types, which liquid and
//! level the type stands for.
//!
//! Liquids are declared once by code and expanded into one block type per
//! `(level, flow direction)` pair, named `<code>-<flow>-<level>`.

pub mod blocks;
pub mod definitions;
pub mod liquid;
pub mod registry;

pub use blocks::{BarrierHeights, BlockType, BlockTypeId};
pub use definitions::{BarrierDefinition, BlockDefinitions, LiquidDefinition, SolidDefinition};
pub use liquid::{
    FlowDirection, LiquidConfig, LiquidId, LiquidVariant, MAX_LEVEL, REPLACEABLE_THRESHOLD,
};
pub use registry::{BlockRegistry, RegistryError};
