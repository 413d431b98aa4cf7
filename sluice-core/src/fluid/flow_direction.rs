//! Which way a liquid voxel appears to flow.

use sluice_registry::{FlowDirection, LiquidId};
use sluice_utils::{BlockPos, Cardinal, Direction};

use super::view::FluidView;
use crate::world::VoxelRead;

/// Derives the flow variant of `liquid` at `pos` at the given `level` from
/// its eight horizontal neighbours.
///
/// Lower liquid neighbours pull the flow toward them, higher ones push it
/// away. The dominant axis wins, X on an exact tie. With no net direction the
/// voxel faces down if it is part of a falling column or has an open side,
/// otherwise it is still.
#[must_use]
pub fn resolve_flow_direction<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
    level: u8,
) -> FlowDirection {
    let mut dx = 0;
    let mut dz = 0;
    let mut any_side_free = false;

    for cardinal in Cardinal::ALL {
        let neighbor = pos.relative_cardinal(cardinal);
        let Some(theirs) = view.liquid(neighbor) else {
            continue;
        };
        if theirs.level == level || !view.fluid(neighbor).is_soft() {
            continue;
        }

        let normal = if theirs.level < level {
            cardinal.normal()
        } else {
            cardinal.opposite().normal()
        };
        dx += normal.x;
        dz += normal.z;

        if let Some(face) = cardinal.as_direction() {
            let facing_us = face.opposite();
            if !view.solid(neighbor).barrier.is_side_solid(facing_us)
                || !view.solid(neighbor.below()).barrier.is_side_solid(facing_us)
            {
                any_side_free = true;
            }
        }
    }

    if dx.abs() >= dz.abs() {
        dz = 0;
    } else {
        dx = 0;
    }

    match (dx.signum(), dz.signum()) {
        (1, _) => FlowDirection::East,
        (-1, _) => FlowDirection::West,
        (_, 1) => FlowDirection::South,
        (_, -1) => FlowDirection::North,
        _ if any_side_free || is_in_falling_column(view, pos, liquid) => FlowDirection::Down,
        _ => FlowDirection::Still,
    }
}

fn is_in_falling_column<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
) -> bool {
    [Direction::Up, Direction::Down].into_iter().any(|dir| {
        view.liquid(pos.relative(dir))
            .is_some_and(|v| v.liquid == liquid && v.flow == FlowDirection::Down)
    })
}
