use rustc_hash::FxHashMap;
use sluice_registry::BlockTypeId;
use sluice_utils::BlockPos;

use super::{Layer, VoxelRead, VoxelWorld};

/// A sparse in-memory world. Unset voxels are `air`.
///
/// Horizontally unbounded, vertically limited to `min_y..=max_y`.
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    solid: FxHashMap<BlockPos, BlockTypeId>,
    fluid: FxHashMap<BlockPos, BlockTypeId>,
    min_y: i32,
    max_y: i32,
}

impl MemoryWorld {
    /// Creates an empty world with the given vertical bounds (inclusive).
    #[must_use]
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            solid: FxHashMap::default(),
            fluid: FxHashMap::default(),
            min_y,
            max_y,
        }
    }

    /// Lowest valid y.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Highest valid y.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Fills the box spanned by two corners (inclusive) on one layer.
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, layer: Layer, id: BlockTypeId) {
        for x in from.x().min(to.x())..=from.x().max(to.x()) {
            for y in from.y().min(to.y())..=from.y().max(to.y()) {
                for z in from.z().min(to.z())..=from.z().max(to.z()) {
                    self.set_voxel(BlockPos::new(x, y, z), layer, id);
                }
            }
        }
    }

    /// All non-empty fluid voxels, in no particular order.
    pub fn fluid_voxels(&self) -> impl Iterator<Item = (BlockPos, BlockTypeId)> + '_ {
        self.fluid.iter().map(|(pos, id)| (*pos, *id))
    }

    /// All non-empty solid voxels, in no particular order.
    pub fn solid_voxels(&self) -> impl Iterator<Item = (BlockPos, BlockTypeId)> + '_ {
        self.solid.iter().map(|(pos, id)| (*pos, *id))
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut FxHashMap<BlockPos, BlockTypeId> {
        match layer {
            Layer::Solid | Layer::MostSolid => &mut self.solid,
            Layer::Fluid => &mut self.fluid,
        }
    }
}

impl VoxelRead for MemoryWorld {
    fn get_voxel(&self, pos: BlockPos, layer: Layer) -> BlockTypeId {
        let solid = || self.solid.get(&pos).copied().unwrap_or(BlockTypeId::AIR);
        let fluid = || self.fluid.get(&pos).copied().unwrap_or(BlockTypeId::AIR);
        match layer {
            Layer::Solid => solid(),
            Layer::Fluid => fluid(),
            Layer::MostSolid => {
                let id = solid();
                if id.is_air() { fluid() } else { id }
            }
        }
    }

    fn is_in_valid_bounds(&self, pos: BlockPos) -> bool {
        (self.min_y..=self.max_y).contains(&pos.y())
    }
}

impl VoxelWorld for MemoryWorld {
    fn set_voxel(&mut self, pos: BlockPos, layer: Layer, id: BlockTypeId) {
        if !self.is_in_valid_bounds(pos) {
            return;
        }
        let map = self.layer_mut(layer);
        if id.is_air() {
            map.remove(&pos);
        } else {
            map.insert(pos, id);
        }
    }
}
