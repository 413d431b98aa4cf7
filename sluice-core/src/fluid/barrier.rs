//! How solid voxels obstruct liquid, and where a liquid may spread.

use sluice_registry::{BlockType, LiquidVariant, MAX_LEVEL};
use sluice_utils::{BlockPos, Direction};

use super::collision::is_different_collidable_liquid;
use super::view::FluidView;
use crate::world::VoxelRead;

/// Barrier height of one face of a solid voxel.
#[inline]
#[must_use]
pub fn barrier_height(block: &BlockType, face: Direction) -> f32 {
    block.barrier.get(face)
}

/// A level as a fraction of a full voxel.
#[inline]
#[must_use]
pub fn level_fraction(level: u8) -> f32 {
    f32::from(level) / f32::from(MAX_LEVEL)
}

/// Returns `true` if liquid at `fraction` cannot cross from `from` to the
/// adjacent `to` through `face` (the face of `from` touching `to`).
///
/// Both solids get a say: the face of `from` and the opposite face of `to`.
#[must_use]
pub fn blocks_passage<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    from: BlockPos,
    to: BlockPos,
    face: Direction,
    fraction: f32,
) -> bool {
    barrier_height(view.solid(from), face) >= fraction
        || barrier_height(view.solid(to), face.opposite()) >= fraction
}

/// Returns `true` if liquid `ours` at `pos` may flow into `neighbor` through
/// `face`.
#[must_use]
pub fn can_spread_into<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    ours: LiquidVariant,
    pos: BlockPos,
    neighbor: BlockPos,
    face: Direction,
) -> bool {
    if !view.in_bounds(neighbor) {
        return false;
    }
    if blocks_passage(view, pos, neighbor, face, level_fraction(ours.level)) {
        return false;
    }

    let target = view.fluid(neighbor);
    match target.liquid {
        Some(theirs) if theirs.is_same_liquid(&ours) => theirs.level < ours.level,
        Some(theirs) => {
            let collides = is_different_collidable_liquid(view.registry(), ours.liquid, theirs.liquid);
            if theirs.is_source() && !collides {
                return false;
            }
            target.replaceable >= view.config(ours.liquid).replaceable
        }
        None if !target.id.is_air() => target.is_soft(),
        None => ours.level > 1 || face == Direction::Down,
    }
}

/// Returns `true` if the floor under `pos` fully holds liquid.
#[must_use]
pub fn is_on_solid_ground<R: VoxelRead + ?Sized>(view: FluidView<'_, R>, pos: BlockPos) -> bool {
    view.solid(pos.below()).barrier.is_side_solid(Direction::Up)
        || view.solid(pos).barrier.is_side_solid(Direction::Down)
}

#[cfg(test)]
mod tests {
    use sluice_registry::{BlockRegistry, BlockTypeId, FlowDirection};

    use super::*;
    use crate::world::{Layer, MemoryWorld, VoxelWorld};

    fn setup() -> (BlockRegistry, MemoryWorld) {
        let registry = BlockRegistry::builtin().expect("builtin registry should build");
        (registry, MemoryWorld::new(0, 16))
    }

    fn water(registry: &BlockRegistry, level: u8) -> LiquidVariant {
        let liquid = registry.liquid_by_code("water").expect("water registered");
        LiquidVariant {
            liquid,
            level,
            flow: FlowDirection::Still,
        }
    }

    #[test]
    fn test_level_fraction() {
        assert!(level_fraction(0).abs() < f32::EPSILON);
        assert!((level_fraction(MAX_LEVEL) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fence_blocks_only_shallow_liquid() {
        let (registry, mut world) = setup();
        let fence = registry.by_code("fence").expect("fence registered");
        let pos = BlockPos::new(0, 1, 0);
        let east = pos.relative(Direction::East);
        world.set_voxel(east, Layer::Solid, fence);

        let view = FluidView::new(&world, &registry);
        // 0.3 of a block stops level 2 (0.29) but not level 3 (0.43).
        assert!(!can_spread_into(view, water(&registry, 2), pos, east, Direction::East));
        assert!(can_spread_into(view, water(&registry, 3), pos, east, Direction::East));
    }

    #[test]
    fn test_level_one_only_falls() {
        let (registry, world) = setup();
        let view = FluidView::new(&world, &registry);
        let pos = BlockPos::new(0, 5, 0);
        let ours = water(&registry, 1);

        assert!(!can_spread_into(view, ours, pos, pos.relative(Direction::North), Direction::North));
        assert!(can_spread_into(view, ours, pos, pos.below(), Direction::Down));
    }

    #[test]
    fn test_same_liquid_only_into_lower() {
        let (registry, mut world) = setup();
        let ours = water(&registry, 5);
        let pos = BlockPos::new(0, 1, 0);
        let west = pos.relative(Direction::West);

        world.set_voxel(west, Layer::Fluid, registry.liquid_block(ours.liquid, 5, FlowDirection::Still));
        assert!(!can_spread_into(FluidView::new(&world, &registry), ours, pos, west, Direction::West));

        world.set_voxel(west, Layer::Fluid, registry.liquid_block(ours.liquid, 3, FlowDirection::Still));
        assert!(can_spread_into(FluidView::new(&world, &registry), ours, pos, west, Direction::West));
    }

    #[test]
    fn test_non_collidable_source_is_never_displaced() {
        let (registry, mut world) = setup();
        let lava = registry.liquid_by_code("lava").expect("lava registered");
        let pos = BlockPos::new(0, 1, 0);
        let south = pos.relative(Direction::South);
        world.set_voxel(south, Layer::Fluid, registry.liquid_block(lava, 7, FlowDirection::Still));

        let view = FluidView::new(&world, &registry);
        assert!(!can_spread_into(view, water(&registry, 7), pos, south, Direction::South));
    }

    #[test]
    fn test_solid_ground() {
        let (registry, mut world) = setup();
        let stone = registry.by_code("stone").expect("stone registered");
        let slab = registry.by_code("slab").expect("slab registered");
        let pos = BlockPos::new(0, 1, 0);

        assert!(!is_on_solid_ground(FluidView::new(&world, &registry), pos));
        world.set_voxel(pos.below(), Layer::Solid, stone);
        assert!(is_on_solid_ground(FluidView::new(&world, &registry), pos));

        world.set_voxel(pos.below(), Layer::Solid, BlockTypeId::AIR);
        world.set_voxel(pos, Layer::Solid, slab);
        assert!(is_on_solid_ground(FluidView::new(&world, &registry), pos));
    }
}
