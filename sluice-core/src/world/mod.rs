//! Access to the voxel world the liquids live in.
//!
//! The world is owned elsewhere; the liquid engine only needs to read and
//! write block type ids on two layers. [`MemoryWorld`] is a sparse in-memory
//! implementation, [`WriteBatch`] stages the writes of one update.

mod batch;
mod memory;

use sluice_registry::BlockTypeId;
use sluice_utils::BlockPos;

pub use batch::{VoxelChange, WriteBatch};
pub use memory::MemoryWorld;

/// A storage layer of a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Terrain and placed blocks.
    Solid,
    /// Liquids.
    Fluid,
    /// The solid layer, or the fluid layer where the solid layer is empty.
    /// Writes go to the solid layer.
    MostSolid,
}

/// Read access to a voxel world.
pub trait VoxelRead {
    /// The block type at `pos` on `layer`. Out of bounds reads are `air`.
    fn get_voxel(&self, pos: BlockPos, layer: Layer) -> BlockTypeId;

    /// Returns `true` if `pos` is inside the world.
    fn is_in_valid_bounds(&self, pos: BlockPos) -> bool;
}

/// Read/write access to a voxel world.
pub trait VoxelWorld: VoxelRead {
    /// Sets the block type at `pos` on `layer`. Out of bounds writes are
    /// ignored.
    fn set_voxel(&mut self, pos: BlockPos, layer: Layer, id: BlockTypeId);
}
