//! What happens when two different liquids meet.

use sluice_registry::{BlockRegistry, BlockTypeId, LiquidConfig, LiquidId, LiquidVariant};
use sluice_utils::{BlockPos, Direction};

use super::spread::UpdateContext;
use super::view::FluidView;
use crate::effects::{EffectEvent, ParticleBurst};
use crate::world::{Layer, VoxelRead};

/// Returns `true` if `ours` reacts with `theirs`.
///
/// The relation is one-sided: lava collides with water, water does not
/// collide with lava.
#[must_use]
pub fn is_different_collidable_liquid(
    registry: &BlockRegistry,
    ours: LiquidId,
    theirs: LiquidId,
) -> bool {
    ours != theirs && registry.liquid(ours).collides_with == Some(theirs)
}

/// What `victim` turns into when touched by the liquid configured by
/// `config`.
#[must_use]
pub fn replacement_for(config: &LiquidConfig, victim: &LiquidVariant) -> Option<BlockTypeId> {
    if victim.is_source() {
        config.source_replacement
    } else {
        config.flowing_replacement
    }
}

/// Returns `true` if no neighbour of `pos` offers a solid face to rest on.
#[must_use]
pub fn is_floating<R: VoxelRead + ?Sized>(view: FluidView<'_, R>, pos: BlockPos) -> bool {
    !Direction::ALL.into_iter().any(|dir| {
        view.solid(pos.relative(dir))
            .barrier
            .is_side_solid(dir.opposite())
    })
}

/// Replaces the liquid at `victim_pos` with the block `acting` produces on
/// contact.
///
/// Without a configured replacement nothing happens and `false` is returned.
pub fn replace_liquid<R: VoxelRead + ?Sized>(
    ctx: &mut UpdateContext<'_, R>,
    acting: LiquidId,
    victim_pos: BlockPos,
) -> bool {
    let view = ctx.view;
    let Some(victim) = view.liquid(victim_pos) else {
        return false;
    };
    let config = view.config(acting);
    let Some(replacement) = replacement_for(config, &victim) else {
        log::debug!(
            "{} has no replacement for {} at {victim_pos}",
            config.code,
            view.config(victim.liquid).code
        );
        return false;
    };

    let block = view.registry().get(replacement);
    let below = victim_pos.below();
    let target = if block.breaks_if_floating
        && is_floating(view, victim_pos)
        && view.in_bounds(below)
        && view.solid(below).is_soft()
    {
        below
    } else {
        victim_pos
    };

    log::debug!(
        "{} turned {} at {victim_pos} into {} at {target}",
        config.code,
        view.config(victim.liquid).code,
        block.code
    );

    ctx.writes.set(victim_pos, Layer::Fluid, BlockTypeId::AIR);
    if block.is_liquid() {
        ctx.writes.set(target, Layer::Fluid, replacement);
    } else {
        ctx.writes.set(target, Layer::Solid, replacement);
    }

    ctx.effects
        .push(EffectEvent::Particles(ParticleBurst::steam(victim_pos)));
    if let Some(sound) = &config.collision_sound {
        ctx.effects.push(EffectEvent::Sound {
            sound: sound.clone(),
            pos: victim_pos,
            range: ctx.sound_range,
        });
    }
    ctx.collisions += 1;
    true
}

#[cfg(test)]
mod tests {
    use sluice_registry::FlowDirection;

    use super::*;
    use crate::fluid::PathScratch;
    use crate::world::{MemoryWorld, VoxelWorld};

    #[test]
    fn test_collision_is_one_sided() {
        let registry = BlockRegistry::builtin().expect("builtin registry should build");
        let water = registry.liquid_by_code("water").expect("water registered");
        let lava = registry.liquid_by_code("lava").expect("lava registered");

        assert!(is_different_collidable_liquid(&registry, lava, water));
        assert!(!is_different_collidable_liquid(&registry, water, lava));
        assert!(!is_different_collidable_liquid(&registry, lava, lava));
    }

    #[test]
    fn test_replacement_depends_on_victim_level() {
        let registry = BlockRegistry::builtin().expect("builtin registry should build");
        let water = registry.liquid_by_code("water").expect("water registered");
        let lava = registry.liquid(registry.liquid_by_code("lava").expect("lava registered"));
        let mut victim = LiquidVariant {
            liquid: water,
            level: 7,
            flow: FlowDirection::Still,
        };

        assert_eq!(replacement_for(lava, &victim), registry.by_code("obsidian"));
        victim.level = 4;
        assert_eq!(replacement_for(lava, &victim), registry.by_code("pumice"));
    }

    #[test]
    fn test_floating_replacement_drops() {
        let registry = BlockRegistry::builtin().expect("builtin registry should build");
        let water = registry.liquid_by_code("water").expect("water registered");
        let lava = registry.liquid_by_code("lava").expect("lava registered");
        let pumice = registry.by_code("pumice").expect("pumice registered");

        let mut world = MemoryWorld::new(0, 16);
        let victim = BlockPos::new(0, 4, 0);
        world.set_voxel(victim, Layer::Fluid, registry.liquid_block(water, 3, FlowDirection::Down));

        let mut scratch = PathScratch::new();
        let mut ctx = UpdateContext::new(FluidView::new(&world, &registry), &mut scratch, 16.0);
        assert!(replace_liquid(&mut ctx, lava, victim));
        let (writes, effects, collisions) = ctx.finish();

        assert_eq!(writes.staged(victim, Layer::Fluid), Some(BlockTypeId::AIR));
        assert_eq!(writes.staged(victim.below(), Layer::Solid), Some(pumice));
        assert_eq!(collisions, 1);
        assert_eq!(effects.len(), 2);
    }
}
