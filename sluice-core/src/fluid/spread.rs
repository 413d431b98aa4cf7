//! The per-voxel liquid update.
//!
//! An update for a voxel holding liquid runs these steps, stopping at the
//! first that applies:
//!
//! 1. **Drain.** A flowing voxel no neighbour can sustain loses one level.
//! 2. **Fall.** Liquid not resting on solid ground falls into the voxel below,
//!    or replaces a liquid it collides with there.
//!    Flowing liquid resting on more of itself stops here.
//! 3. **Route.** Liquid with a reachable drop nearby flows toward the nearest
//!    drops only.
//! 4. **Spread.** Otherwise it spreads to its four horizontal neighbours at
//!    one level less.
//!
//! Finally a flowing voxel surrounded by enough sources becomes a source.

use sluice_registry::{BlockTypeId, FlowDirection, LiquidId, LiquidVariant, MAX_LEVEL};
use sluice_utils::{BlockPos, Direction};

use super::barrier::{can_spread_into, is_on_solid_ground};
use super::collision::{is_different_collidable_liquid, replace_liquid};
use super::level::{is_fed_from_above, is_source, max_neighbor_level, should_crystallize};
use super::pathfinder::{PathScratch, find_downward_paths};
use super::view::FluidView;
use crate::effects::EffectEvent;
use crate::world::{Layer, VoxelRead, WriteBatch};

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The voxel no longer holds the expected liquid.
    Stale,
    /// Lost one level.
    Drained,
    /// Fell or collided downward.
    Fell,
    /// Flowed toward a nearby drop.
    Routed,
    /// Spread horizontally.
    Spread,
    /// Became a source.
    Crystallized,
    /// Nothing to do.
    Idle,
}

/// State of a single update: the pre-update view, the staged writes and the
/// queued effects.
pub struct UpdateContext<'a, R: VoxelRead + ?Sized> {
    /// The world as it was before this update.
    pub view: FluidView<'a, R>,
    /// Writes made by this update.
    pub writes: WriteBatch,
    /// Effects to emit once the writes are committed.
    pub effects: Vec<EffectEvent>,
    /// Collisions that replaced a voxel.
    pub collisions: usize,
    /// Audible range of collision sounds.
    pub sound_range: f32,
    scratch: &'a mut PathScratch,
}

impl<'a, R: VoxelRead + ?Sized> UpdateContext<'a, R> {
    /// Creates a context with nothing staged.
    pub fn new(view: FluidView<'a, R>, scratch: &'a mut PathScratch, sound_range: f32) -> Self {
        Self {
            view,
            writes: WriteBatch::new(),
            effects: Vec::new(),
            collisions: 0,
            sound_range,
            scratch,
        }
    }

    /// Stages `liquid` at `level` into the fluid layer of `pos`. Level `0`
    /// stages `air`.
    ///
    /// A voxel already holding `liquid` at `level` keeps its flow variant:
    /// flow is re-derived after the commit, never written as a change.
    pub fn stage_liquid(&mut self, pos: BlockPos, liquid: LiquidId, level: u8, flow: FlowDirection) {
        let id = if level == 0 {
            BlockTypeId::AIR
        } else if let Some(current) = self.view.liquid(pos)
            && current.liquid == liquid
            && current.level == level
        {
            self.view.registry().liquid_block(liquid, level, current.flow)
        } else {
            self.view.registry().liquid_block(liquid, level, flow)
        };
        self.writes.set(pos, Layer::Fluid, id);
    }

    /// Consumes the context, returning the staged writes, the queued effects
    /// and the number of collisions.
    #[must_use]
    pub fn finish(self) -> (WriteBatch, Vec<EffectEvent>, usize) {
        (self.writes, self.effects, self.collisions)
    }
}

/// Runs one update of the liquid at `pos`.
pub fn update_liquid<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    pos: BlockPos,
) -> UpdateOutcome {
    let view = ctx.view;
    let Some(variant) = view.liquid(pos) else {
        return UpdateOutcome::Stale;
    };
    let liquid = variant.liquid;

    if !is_source(&variant) && max_neighbor_level(view, pos, liquid) <= variant.level {
        log::trace!("Draining {} at {pos} to {}", view.config(liquid).code, variant.level - 1);
        ctx.stage_liquid(pos, liquid, variant.level - 1, variant.flow);
        return UpdateOutcome::Drained;
    }

    if fall(ctx, pos, variant) {
        return UpdateOutcome::Fell;
    }
    if !is_source(&variant) && rests_on_own_liquid(view, pos, liquid) {
        return UpdateOutcome::Idle;
    }

    if variant.level > 1 {
        let paths = find_downward_paths(view, ctx.scratch, pos, variant);
        if !paths.is_empty() {
            for path in &paths {
                flow_into(ctx, pos, variant, path.first_step);
            }
            return UpdateOutcome::Routed;
        }
    }

    let spread = spread_horizontally(ctx, pos, variant);

    if should_crystallize(view, pos, &variant) {
        log::trace!("{} at {pos} became a source", view.config(liquid).code);
        ctx.stage_liquid(pos, liquid, MAX_LEVEL, FlowDirection::Still);
        return UpdateOutcome::Crystallized;
    }

    if spread {
        UpdateOutcome::Spread
    } else {
        UpdateOutcome::Idle
    }
}

/// Moves liquid into the voxel below. Returns `true` if the liquid fell or
/// collided.
fn fall<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    pos: BlockPos,
    variant: LiquidVariant,
) -> bool {
    let view = ctx.view;
    if is_on_solid_ground(view, pos) {
        return false;
    }
    let below = pos.below();
    if !can_spread_into(view, variant, pos, below, Direction::Down) {
        return false;
    }

    if let Some(theirs) = view.liquid(below)
        && is_different_collidable_liquid(view.registry(), variant.liquid, theirs.liquid)
    {
        if !replace_liquid(ctx, variant.liquid, below) {
            return false;
        }
        find_source_and_spread(ctx, pos, variant.liquid);
        return true;
    }

    let effective = if is_source(&variant) || is_fed_from_above(view, pos, variant.liquid) {
        MAX_LEVEL
    } else {
        variant.level
    };
    let falling = effective - 1;
    if falling == 0 {
        return false;
    }
    // The column below is already in place.
    if view.level_of(below, variant.liquid) != falling {
        ctx.stage_liquid(below, variant.liquid, falling, FlowDirection::Down);
    }
    find_source_and_spread(ctx, pos.above(), variant.liquid);
    true
}

/// Flowing liquid held up by more of itself instead of a floor only feeds
/// downward.
fn rests_on_own_liquid<R: VoxelRead + ?Sized>(
    view: FluidView<'_, R>,
    pos: BlockPos,
    liquid: LiquidId,
) -> bool {
    !is_on_solid_ground(view, pos) && view.level_of(pos.below(), liquid) > 0
}

/// Walks up the column of `liquid` starting at `start` and spreads
/// horizontally from the first source found.
pub fn find_source_and_spread<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    start: BlockPos,
    liquid: LiquidId,
) -> bool {
    let mut pos = start;
    while ctx.view.in_bounds(pos) {
        let Some(variant) = ctx.view.liquid(pos).filter(|v| v.liquid == liquid) else {
            return false;
        };
        if is_source(&variant) {
            return spread_horizontally(ctx, pos, variant);
        }
        pos = pos.above();
    }
    false
}

/// Spreads `variant` from `pos` into each horizontal neighbour that accepts
/// it.
pub fn spread_horizontally<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    pos: BlockPos,
    variant: LiquidVariant,
) -> bool {
    let mut spread = false;
    for dir in Direction::HORIZONTAL {
        spread |= flow_into(ctx, pos, variant, pos.relative(dir));
    }
    spread
}

/// Flows from `pos` into the adjacent `target`, colliding with or spreading
/// into whatever is there.
fn flow_into<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    pos: BlockPos,
    variant: LiquidVariant,
    target: BlockPos,
) -> bool {
    let view = ctx.view;
    let Some(face) = pos.facing_towards(target) else {
        return false;
    };
    if !can_spread_into(view, variant, pos, target, face) {
        return false;
    }
    match view.liquid(target) {
        Some(theirs)
            if is_different_collidable_liquid(view.registry(), variant.liquid, theirs.liquid) =>
        {
            replace_liquid(ctx, variant.liquid, target)
        }
        _ => spread_liquid(ctx, variant.liquid, target, variant.level - 1),
    }
}

/// Sets `target` to `liquid` at `level` and lets the new liquid react with
/// its horizontal neighbours.
///
/// A target already holding `liquid` at `level` is left alone.
pub fn spread_liquid<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    liquid: LiquidId,
    target: BlockPos,
    level: u8,
) -> bool {
    let view = ctx.view;
    if level == 0 || view.level_of(target, liquid) == level {
        return false;
    }
    ctx.stage_liquid(target, liquid, level, FlowDirection::Still);

    for dir in Direction::HORIZONTAL {
        let neighbor = target.relative(dir);
        if let Some(theirs) = view.liquid(neighbor)
            && is_different_collidable_liquid(view.registry(), liquid, theirs.liquid)
        {
            replace_liquid(ctx, liquid, neighbor);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use sluice_registry::BlockRegistry;

    use super::*;
    use crate::world::{MemoryWorld, VoxelWorld};

    struct Fixture {
        registry: BlockRegistry,
        world: MemoryWorld,
        water: LiquidId,
        scratch: PathScratch,
    }

    impl Fixture {
        fn floored() -> Self {
            let registry = BlockRegistry::builtin().expect("builtin registry should build");
            let water = registry.liquid_by_code("water").expect("water registered");
            let stone = registry.by_code("stone").expect("stone registered");
            let mut world = MemoryWorld::new(0, 16);
            world.fill(BlockPos::new(-16, 0, -16), BlockPos::new(16, 0, 16), Layer::Solid, stone);
            Self {
                registry,
                world,
                water,
                scratch: PathScratch::new(),
            }
        }

        fn put(&mut self, pos: BlockPos, level: u8) {
            let id = self.registry.liquid_block(self.water, level, FlowDirection::Still);
            self.world.set_voxel(pos, Layer::Fluid, id);
        }

        /// Runs one update and commits it.
        fn update(&mut self, pos: BlockPos) -> UpdateOutcome {
            let view = FluidView::new(&self.world, &self.registry);
            let mut ctx = UpdateContext::new(view, &mut self.scratch, 16.0);
            let outcome = update_liquid(&mut ctx, pos);
            let (writes, _, _) = ctx.finish();
            writes.commit(&mut self.world);
            outcome
        }

        fn level(&self, pos: BlockPos) -> u8 {
            FluidView::new(&self.world, &self.registry).level_of(pos, self.water)
        }
    }

    #[test]
    fn test_source_spreads_one_level_less() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 1, 0);
        fx.put(pos, 7);

        assert_eq!(fx.update(pos), UpdateOutcome::Spread);
        for dir in Direction::HORIZONTAL {
            assert_eq!(fx.level(pos.relative(dir)), 6);
        }
        assert_eq!(fx.level(pos), 7);
        // Nothing left to do: neighbours are already at 6.
        assert_eq!(fx.update(pos), UpdateOutcome::Idle);
    }

    #[test]
    fn test_isolated_voxel_drains() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 1, 0);
        fx.put(pos, 2);

        assert_eq!(fx.update(pos), UpdateOutcome::Drained);
        assert_eq!(fx.level(pos), 1);
        assert_eq!(fx.update(pos), UpdateOutcome::Drained);
        assert_eq!(fx.level(pos), 0);
        assert_eq!(fx.update(pos), UpdateOutcome::Stale);
    }

    #[test]
    fn test_reads_see_pre_update_state() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 1, 0);
        fx.put(pos, 7);

        let view = FluidView::new(&fx.world, &fx.registry);
        let mut ctx = UpdateContext::new(view, &mut fx.scratch, 16.0);
        update_liquid(&mut ctx, pos);
        // The spread is staged but not yet visible.
        assert_eq!(ctx.view.level_of(pos.relative(Direction::East), fx.water), 0);
        assert!(!ctx.writes.is_empty());
    }

    #[test]
    fn test_source_falls_before_spreading() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 3, 0);
        fx.put(pos, 7);

        assert_eq!(fx.update(pos), UpdateOutcome::Fell);
        assert_eq!(fx.level(pos.below()), 6);
        assert_eq!(fx.level(pos.relative(Direction::East)), 0);
    }

    #[test]
    fn test_crystallizes_between_sources() {
        let mut fx = Fixture::floored();
        let stone = fx.registry.by_code("stone").expect("stone registered");
        let pos = BlockPos::new(0, 1, 0);
        fx.put(pos, 3);
        fx.put(pos.relative(Direction::East), 7);
        fx.put(pos.relative(Direction::West), 7);
        fx.put(pos.relative(Direction::North), 7);
        fx.world.set_voxel(pos.relative(Direction::South), Layer::Solid, stone);

        assert_eq!(fx.update(pos), UpdateOutcome::Crystallized);
        assert_eq!(fx.level(pos), 7);
    }

    #[test]
    fn test_flowing_over_own_liquid_does_not_spread() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 2, 0);
        fx.put(pos.below(), 6);
        fx.put(pos, 6);
        fx.put(pos.above(), 7);

        assert_eq!(fx.update(pos), UpdateOutcome::Idle);
        assert_eq!(fx.level(pos.relative(Direction::East)), 0);
    }

    #[test]
    fn test_established_fall_stages_nothing() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 4, 0);
        fx.put(pos, 7);
        assert_eq!(fx.update(pos), UpdateOutcome::Fell);
        assert_eq!(fx.level(pos.below()), 6);

        // Whatever flow the column shows, a repeated fall is not a change.
        let east = fx.registry.liquid_block(fx.water, 6, FlowDirection::East);
        fx.world.set_voxel(pos.below(), Layer::Fluid, east);
        let view = FluidView::new(&fx.world, &fx.registry);
        let mut ctx = UpdateContext::new(view, &mut fx.scratch, 16.0);
        assert_eq!(update_liquid(&mut ctx, pos), UpdateOutcome::Fell);
        let (writes, _, _) = ctx.finish();
        assert!(writes.is_empty());
    }

    #[test]
    fn test_restaging_same_level_keeps_flow() {
        let mut fx = Fixture::floored();
        let pos = BlockPos::new(0, 1, 0);
        let north = fx.registry.liquid_block(fx.water, 4, FlowDirection::North);
        fx.world.set_voxel(pos, Layer::Fluid, north);

        let view = FluidView::new(&fx.world, &fx.registry);
        let mut ctx = UpdateContext::new(view, &mut fx.scratch, 16.0);
        ctx.stage_liquid(pos, fx.water, 4, FlowDirection::Down);
        let (writes, _, _) = ctx.finish();
        assert!(writes.commit(&mut fx.world).is_empty());
    }
}
