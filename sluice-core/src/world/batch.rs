use rustc_hash::FxHashMap;
use sluice_registry::BlockTypeId;
use sluice_utils::BlockPos;

use super::{Layer, VoxelWorld};

/// A voxel write that changed the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelChange {
    /// Where.
    pub pos: BlockPos,
    /// [`Layer::Solid`] or [`Layer::Fluid`].
    pub layer: Layer,
    /// Type before the write.
    pub old: BlockTypeId,
    /// Type after the write.
    pub new: BlockTypeId,
}

#[derive(Debug, Clone, Copy)]
struct StagedWrite {
    pos: BlockPos,
    layer: Layer,
    id: BlockTypeId,
}

/// Buffered writes of a single liquid update.
///
/// Nothing reaches the world until [`WriteBatch::commit`], so every read made
/// while deciding an update sees the state from before it. A later write to
/// the same voxel and layer replaces the earlier one.
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<StagedWrite>,
    index: FxHashMap<(BlockPos, Layer), usize>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a write. [`Layer::MostSolid`] stages to the solid layer.
    pub fn set(&mut self, pos: BlockPos, layer: Layer, id: BlockTypeId) {
        let layer = match layer {
            Layer::MostSolid => Layer::Solid,
            other => other,
        };
        if let Some(&slot) = self.index.get(&(pos, layer)) {
            self.writes[slot].id = id;
        } else {
            self.index.insert((pos, layer), self.writes.len());
            self.writes.push(StagedWrite { pos, layer, id });
        }
    }

    /// The write staged for a voxel layer, if any.
    #[must_use]
    pub fn staged(&self, pos: BlockPos, layer: Layer) -> Option<BlockTypeId> {
        let layer = if layer == Layer::MostSolid {
            Layer::Solid
        } else {
            layer
        };
        self.index.get(&(pos, layer)).map(|&slot| self.writes[slot].id)
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Applies all staged writes in staging order and returns the ones that
    /// changed something.
    pub fn commit<W: VoxelWorld + ?Sized>(self, world: &mut W) -> Vec<VoxelChange> {
        let mut changes = Vec::with_capacity(self.writes.len());
        for write in self.writes {
            if !world.is_in_valid_bounds(write.pos) {
                continue;
            }
            let old = world.get_voxel(write.pos, write.layer);
            if old == write.id {
                continue;
            }
            world.set_voxel(write.pos, write.layer, write.id);
            changes.push(VoxelChange {
                pos: write.pos,
                layer: write.layer,
                old,
                new: write.id,
            });
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{MemoryWorld, VoxelRead};

    #[test]
    fn test_last_write_wins() {
        let mut world = MemoryWorld::new(0, 8);
        let pos = BlockPos::new(0, 1, 0);
        let mut batch = WriteBatch::new();

        batch.set(pos, Layer::Fluid, BlockTypeId(3));
        batch.set(pos, Layer::Fluid, BlockTypeId(4));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.staged(pos, Layer::Fluid), Some(BlockTypeId(4)));
        // Staged writes are invisible to the world.
        assert!(world.get_voxel(pos, Layer::Fluid).is_air());

        let changes = batch.commit(&mut world);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new, BlockTypeId(4));
        assert_eq!(world.get_voxel(pos, Layer::Fluid), BlockTypeId(4));
    }

    #[test]
    fn test_noop_writes_are_not_changes() {
        let mut world = MemoryWorld::new(0, 8);
        let pos = BlockPos::new(2, 2, 2);
        world.set_voxel(pos, Layer::Solid, BlockTypeId(1));

        let mut batch = WriteBatch::new();
        batch.set(pos, Layer::MostSolid, BlockTypeId(1));
        batch.set(pos, Layer::Fluid, BlockTypeId::AIR);
        assert!(batch.commit(&mut world).is_empty());
    }
}
