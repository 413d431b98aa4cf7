//! Search for nearby places where a liquid can fall.
//!
//! Without this, liquid on a flat surface would spread evenly in every
//! direction. With it, liquid that has a reachable hole nearby flows toward
//! the hole instead.

use std::collections::VecDeque;
use std::sync::LazyLock;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use sluice_registry::LiquidVariant;
use sluice_utils::math::Vector2;
use sluice_utils::{BlockPos, Direction};

use super::barrier::{blocks_passage, level_fraction};
use super::view::FluidView;
use crate::world::VoxelRead;

/// Farthest horizontal Manhattan distance a drop may be from the origin.
pub const MAX_SEARCH_RADIUS: i32 = 12;

/// Node expansions allowed per candidate drop.
pub const MAX_PATH_EXPANSIONS: usize = 99;

/// Horizontal offsets within [`MAX_SEARCH_RADIUS`], nearest first.
static SEED_OFFSETS: LazyLock<Vec<Vector2<i32>>> = LazyLock::new(|| {
    let mut offsets = Vec::new();
    for dx in -MAX_SEARCH_RADIUS..=MAX_SEARCH_RADIUS {
        for dz in -MAX_SEARCH_RADIUS..=MAX_SEARCH_RADIUS {
            let offset = Vector2::new(dx, dz);
            let distance = offset.manhattan_length();
            if distance > 0 && distance <= MAX_SEARCH_RADIUS {
                offsets.push(offset);
            }
        }
    }
    offsets.sort_by_key(|offset| (offset.manhattan_length(), offset.y, offset.x));
    offsets
});

/// A route from a liquid voxel to a place where it can fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownhillPath {
    /// The neighbour of the origin the route starts with.
    pub first_step: BlockPos,
    /// The voxel above the hole.
    pub drop: BlockPos,
    /// Horizontal Manhattan distance from the origin to `drop`.
    pub distance: i32,
}

/// Search buffers, reused between searches.
#[derive(Debug, Default)]
pub struct PathScratch {
    queue: VecDeque<BlockPos>,
    visited: FxHashSet<BlockPos>,
}

impl PathScratch {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Finds the nearest reachable drops from `origin`.
///
/// All drops tied for the shortest distance are returned. A drop right next
/// to a voxel that is not a source is returned on its own as soon as it is
/// found.
pub fn find_downward_paths<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    scratch: &mut PathScratch,
    origin: BlockPos,
    variant: LiquidVariant,
) -> SmallVec<[DownhillPath; 4]> {
    let mut paths = SmallVec::new();
    let mut best = i32::MAX;

    for offset in SEED_OFFSETS.iter() {
        let distance = offset.manhattan_length();
        if distance > best {
            break;
        }

        let drop = origin.offset_horizontal(*offset);
        if !is_drop_candidate(view, drop, variant) {
            continue;
        }
        let Some(first_step) = trace_back(view, scratch, origin, drop, variant.level) else {
            continue;
        };

        let path = DownhillPath {
            first_step,
            drop,
            distance,
        };
        if distance == 1 && !variant.is_source() {
            paths.clear();
            paths.push(path);
            return paths;
        }
        best = distance;
        paths.push(path);
    }
    paths
}

/// A drop needs a soft voxel below it, a soft solid layer itself and a lower
/// liquid level than the origin, whatever liquid that is.
fn is_drop_candidate<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    drop: BlockPos,
    variant: LiquidVariant,
) -> bool {
    let below = drop.below();
    view.in_bounds(drop)
        && view.in_bounds(below)
        && view.most_solid(below).is_soft()
        && view.solid(drop).is_soft()
        && view.liquid(drop).map_or(0, |theirs| theirs.level) < variant.level
}

/// Breadth-first search from `drop` back to `origin`, only ever moving closer
/// to the origin. Returns the last node before the origin.
fn trace_back<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    scratch: &mut PathScratch,
    origin: BlockPos,
    drop: BlockPos,
    level: u8,
) -> Option<BlockPos> {
    scratch.queue.clear();
    scratch.visited.clear();
    scratch.queue.push_back(drop);
    scratch.visited.insert(drop);

    let mut expanded = 0;
    while let Some(node) = scratch.queue.pop_front() {
        expanded += 1;
        if expanded > MAX_PATH_EXPANSIONS {
            break;
        }
        let node_distance = node.manhattan_distance(origin);

        for dir in Direction::HORIZONTAL {
            let next = node.relative(dir);
            let next_distance = next.manhattan_distance(origin);
            if next_distance > node_distance || !scratch.visited.insert(next) {
                continue;
            }
            // Liquid flows from `next` into `node` at the level it has left
            // there, never less than the lowest level.
            let remaining = (i32::from(level) - next_distance).max(1);
            let fraction = level_fraction(u8::try_from(remaining).unwrap_or(1));
            if blocks_passage(view, next, node, dir.opposite(), fraction) {
                continue;
            }
            if next == origin {
                return Some(node);
            }
            scratch.queue.push_back(next);
        }
    }
    None
}
