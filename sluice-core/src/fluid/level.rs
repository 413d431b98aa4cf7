//! Source detection and the level a voxel can be sustained at.

use sluice_registry::{LiquidId, LiquidVariant, MAX_LEVEL};
use sluice_utils::{BlockPos, Cardinal, Direction};

use super::barrier::{blocks_passage, level_fraction};
use super::view::FluidView;
use crate::world::VoxelRead;

/// Returns `true` for a full, inexhaustible voxel.
#[inline]
#[must_use]
pub const fn is_source(variant: &LiquidVariant) -> bool {
    variant.level == MAX_LEVEL
}

/// Returns `true` if the same liquid sits directly above `pos` and nothing in
/// `pos`'s solid layer separates them.
#[must_use]
pub fn is_fed_from_above<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
) -> bool {
    view.level_of(pos.above(), liquid) > 0 && view.solid(pos).barrier.get(Direction::Up) <= 0.0
}

/// The highest level the neighbours of `pos` can sustain it at.
///
/// A column fed from above always counts as full. Otherwise the highest
/// horizontal neighbour of the same liquid wins, ignoring neighbours whose
/// level does not reach over the barrier between the two voxels.
#[must_use]
pub fn max_neighbor_level<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
) -> u8 {
    if is_fed_from_above(view, pos, liquid) {
        return MAX_LEVEL;
    }

    let mut max = 0;
    for dir in Direction::HORIZONTAL {
        let neighbor = pos.relative(dir);
        let level = view.level_of(neighbor, liquid);
        if level == 0 || level <= max {
            continue;
        }
        if blocks_passage(view, pos, neighbor, dir, level_fraction(level)) {
            continue;
        }
        max = level;
    }
    max
}

/// Number of same-liquid sources among the four cardinal neighbours.
#[must_use]
pub fn count_cardinal_sources<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
) -> usize {
    Direction::HORIZONTAL
        .into_iter()
        .filter(|dir| view.level_of(pos.relative(*dir), liquid) == MAX_LEVEL)
        .count()
}

/// Number of same-liquid sources among the four diagonal neighbours.
#[must_use]
pub fn count_diagonal_sources<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
) -> usize {
    Cardinal::DIAGONALS
        .into_iter()
        .filter(|dir| view.level_of(pos.relative_cardinal(*dir), liquid) == MAX_LEVEL)
        .count()
}

/// Returns `true` if a flowing voxel is surrounded by enough sources to
/// become one.
///
/// Three cardinal sources suffice, two when at least three diagonals are
/// sources as well.
#[must_use]
pub fn should_crystallize<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    variant: &LiquidVariant,
) -> bool {
    if is_source(variant) {
        return false;
    }
    match count_cardinal_sources(view, pos, variant.liquid) {
        0 | 1 => false,
        2 => count_diagonal_sources(view, pos, variant.liquid) >= 3,
        _ => true,
    }
}
