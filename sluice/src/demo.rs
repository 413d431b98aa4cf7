use std::sync::Arc;

use anyhow::{Context, bail};
use sluice_core::{Layer, LiquidSimulation, LogEffects, MemoryWorld, SimulationConfig, VoxelRead};
use sluice_registry::{BlockRegistry, BlockTypeId, MAX_LEVEL};
use sluice_utils::BlockPos;

const FLOOR_RADIUS: i32 = 12;
const RIM: i32 = 9;
const MAX_STEPS: usize = 4000;

/// Builds the basin, lets the liquids settle and prints the floor layer.
pub fn run(registry: Arc<BlockRegistry>, config: SimulationConfig) -> anyhow::Result<()> {
    let world = build_basin(&registry, &config)?;
    let step = config.tick_interval_ms;
    let mut sim = LiquidSimulation::new(Arc::clone(&registry), world, LogEffects, config);

    sim.place_liquid(BlockPos::new(-4, 5, 0), "water", MAX_LEVEL)
        .context("failed to place water")?;
    sim.place_liquid(BlockPos::new(5, 1, 3), "lava", MAX_LEVEL)
        .context("failed to place lava")?;

    let mut steps = 0;
    while !sim.scheduler().is_empty() {
        if steps == MAX_STEPS {
            bail!("liquids still moving after {MAX_STEPS} steps");
        }
        let ran = sim.advance(step);
        steps += 1;
        if steps % 20 == 0 {
            tracing::info!(now = sim.now(), ran, pending = sim.pending_updates(), "Flowing");
        }
    }

    let stats = sim.stats();
    log::info!(
        "Settled at {}ms: {} updates, {} stale, {} voxels changed, {} collisions",
        sim.now(),
        stats.updates_run,
        stats.stale_wakes,
        stats.voxels_changed,
        stats.collisions
    );
    print_layer(&registry, sim.world(), 1);
    Ok(())
}

/// A stone floor ringed by a two-high rim, with a pillar for the waterfall
/// and a fence splitting the basin.
fn build_basin(registry: &BlockRegistry, config: &SimulationConfig) -> anyhow::Result<MemoryWorld> {
    let block = |code: &str| {
        registry
            .by_code(code)
            .with_context(|| format!("block `{code}` is not registered"))
    };
    let stone = block("stone")?;
    let fence = block("fence")?;

    let mut world = MemoryWorld::new(config.min_y, config.max_y);
    world.fill(
        BlockPos::new(-FLOOR_RADIUS, 0, -FLOOR_RADIUS),
        BlockPos::new(FLOOR_RADIUS, 0, FLOOR_RADIUS),
        Layer::Solid,
        stone,
    );
    for (from, to) in [
        (BlockPos::new(-RIM, 1, -RIM), BlockPos::new(RIM, 2, -RIM)),
        (BlockPos::new(-RIM, 1, RIM), BlockPos::new(RIM, 2, RIM)),
        (BlockPos::new(-RIM, 1, -RIM), BlockPos::new(-RIM, 2, RIM)),
        (BlockPos::new(RIM, 1, -RIM), BlockPos::new(RIM, 2, RIM)),
    ] {
        world.fill(from, to, Layer::Solid, stone);
    }
    world.fill(BlockPos::new(-4, 1, 0), BlockPos::new(-4, 4, 0), Layer::Solid, stone);
    world.fill(BlockPos::new(1, 1, -RIM + 1), BlockPos::new(1, 1, -2), Layer::Solid, fence);
    Ok(world)
}

fn print_layer(registry: &BlockRegistry, world: &MemoryWorld, y: i32) {
    println!("Layer y={y}:");
    for z in -FLOOR_RADIUS..=FLOOR_RADIUS {
        let row: String = (-FLOOR_RADIUS..=FLOOR_RADIUS)
            .map(|x| glyph(registry, world, BlockPos::new(x, y, z)))
            .collect();
        println!("{row}");
    }
}

/// Water shows its level as a digit, other liquids as a letter, solids by
/// the first letter of their code.
fn glyph(registry: &BlockRegistry, world: &MemoryWorld, pos: BlockPos) -> char {
    let fluid = registry.get(world.get_voxel(pos, Layer::Fluid));
    if let Some(variant) = fluid.liquid {
        return if registry.liquid(variant.liquid).code == "water" {
            char::from(b'0' + variant.level)
        } else {
            char::from(b'a' + variant.level - 1)
        };
    }
    let solid = world.get_voxel(pos, Layer::Solid);
    if solid == BlockTypeId::AIR {
        return '.';
    }
    registry
        .get(solid)
        .code
        .chars()
        .next()
        .map_or('?', |c| c.to_ascii_uppercase())
}
