//! Read-only view of the world through the block registry.

use sluice_registry::{BlockRegistry, BlockType, LiquidConfig, LiquidId, LiquidVariant};
use sluice_utils::BlockPos;

use crate::world::{Layer, VoxelRead};

/// A world paired with its registry.
///
/// All liquid decisions are made through this view so they see the world as
/// it was before the current update.
pub struct FluidView<'a, R: VoxelRead + ?Sized> {
    world: &'a R,
    registry: &'a BlockRegistry,
}

impl<R: VoxelRead + ?Sized> Clone for FluidView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VoxelRead + ?Sized> Copy for FluidView<'_, R> {}

impl<'a, R: VoxelRead + ?Sized> FluidView<'a, R> {
    /// Creates a view.
    #[must_use]
    pub const fn new(world: &'a R, registry: &'a BlockRegistry) -> Self {
        Self { world, registry }
    }

    /// The registry.
    #[must_use]
    pub const fn registry(&self) -> &'a BlockRegistry {
        self.registry
    }

    /// The underlying world.
    #[must_use]
    pub const fn world(&self) -> &'a R {
        self.world
    }

    /// The block type at a layer.
    #[inline]
    #[must_use]
    pub fn block(&self, pos: BlockPos, layer: Layer) -> &'a BlockType {
        self.registry.get(self.world.get_voxel(pos, layer))
    }

    /// The fluid layer.
    #[inline]
    #[must_use]
    pub fn fluid(&self, pos: BlockPos) -> &'a BlockType {
        self.block(pos, Layer::Fluid)
    }

    /// The solid layer.
    #[inline]
    #[must_use]
    pub fn solid(&self, pos: BlockPos) -> &'a BlockType {
        self.block(pos, Layer::Solid)
    }

    /// The solid layer, or the fluid layer where no solid is present.
    #[inline]
    #[must_use]
    pub fn most_solid(&self, pos: BlockPos) -> &'a BlockType {
        self.block(pos, Layer::MostSolid)
    }

    /// The liquid held at `pos`, if any.
    #[inline]
    #[must_use]
    pub fn liquid(&self, pos: BlockPos) -> Option<LiquidVariant> {
        self.fluid(pos).liquid
    }

    /// The level of `liquid` at `pos`, `0` if another liquid or none is there.
    #[inline]
    #[must_use]
    pub fn level_of(&self, pos: BlockPos, liquid: LiquidId) -> u8 {
        self.liquid(pos)
            .filter(|variant| variant.liquid == liquid)
            .map_or(0, |variant| variant.level)
    }

    /// Configuration of a liquid.
    #[inline]
    #[must_use]
    pub fn config(&self, liquid: LiquidId) -> &'a LiquidConfig {
        self.registry.liquid(liquid)
    }

    /// Returns `true` if `pos` is inside the world.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, pos: BlockPos) -> bool {
        self.world.is_in_valid_bounds(pos)
    }
}
