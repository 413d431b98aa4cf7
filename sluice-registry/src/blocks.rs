//! Voxel type descriptors.

use sluice_utils::Direction;

use crate::liquid::{LiquidVariant, REPLACEABLE_THRESHOLD};

/// A raw voxel type id. Using the registry this id can be turned into a
/// [`BlockType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockTypeId(pub u16);

impl BlockTypeId {
    /// The empty voxel. Always registered first.
    pub const AIR: BlockTypeId = BlockTypeId(0);

    /// Returns true for the empty voxel.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// Per-face liquid barrier heights, each in `[0, 1]`.
///
/// Liquid passes a face only while its level fraction is above the face's
/// height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierHeights([f32; 6]);

impl BarrierHeights {
    /// No obstruction on any face.
    pub const NONE: BarrierHeights = BarrierHeights([0.0; 6]);
    /// Fully closed on every face.
    pub const FULL: BarrierHeights = BarrierHeights([1.0; 6]);

    /// Builds heights from an array indexed by [`Direction::index`].
    #[must_use]
    pub fn from_faces(heights: [f32; 6]) -> Self {
        Self(heights.map(|h| h.clamp(0.0, 1.0)))
    }

    /// The same height on every face.
    #[must_use]
    pub fn uniform(height: f32) -> Self {
        Self::from_faces([height; 6])
    }

    /// Barrier height of one face.
    #[inline]
    #[must_use]
    pub const fn get(&self, face: Direction) -> f32 {
        self.0[face.index()]
    }

    /// A face is solid when it blocks every level.
    #[inline]
    #[must_use]
    pub fn is_side_solid(&self, face: Direction) -> bool {
        self.get(face) >= 1.0
    }
}

impl Default for BarrierHeights {
    fn default() -> Self {
        Self::NONE
    }
}

/// A registered voxel type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockType {
    /// Registry id.
    pub id: BlockTypeId,
    /// Unique code, e.g. `stone` or `water-still-7`.
    pub code: String,
    /// Softness score. Higher is easier to overwrite.
    pub replaceable: u16,
    /// How much each face obstructs liquid.
    pub barrier: BarrierHeights,
    /// Falls one voxel when nothing solid touches it after being placed by a
    /// liquid collision.
    pub breaks_if_floating: bool,
    /// Set for fluid-layer liquid types.
    pub liquid: Option<LiquidVariant>,
}

impl BlockType {
    /// Returns true for liquid types.
    #[inline]
    #[must_use]
    pub const fn is_liquid(&self) -> bool {
        self.liquid.is_some()
    }

    /// Liquid level, `0` for non-liquids.
    #[inline]
    #[must_use]
    pub fn liquid_level(&self) -> u8 {
        self.liquid.map_or(0, |variant| variant.level)
    }

    /// Returns true if any liquid may overwrite this type.
    #[inline]
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        self.replaceable >= REPLACEABLE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_clamps() {
        let barrier = BarrierHeights::from_faces([2.0, -1.0, 0.5, 0.5, 0.5, 0.5]);
        assert!((barrier.get(Direction::Down) - 1.0).abs() < f32::EPSILON);
        assert!(barrier.get(Direction::Up).abs() < f32::EPSILON);
        assert!(barrier.is_side_solid(Direction::Down));
        assert!(!barrier.is_side_solid(Direction::North));
    }
}
