//! The driver owning the world and the update queue.

use std::iter;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use sluice_registry::{BlockRegistry, BlockTypeId, FlowDirection, LiquidId, LiquidVariant, MAX_LEVEL};
use sluice_utils::{BlockPos, Cardinal, Direction};

use crate::config::SimulationConfig;
use crate::effects::LiquidEffects;
use crate::error::SimulationError;
use crate::fluid::{FluidView, PathScratch, UpdateContext, resolve_flow_direction, update_liquid};
use crate::ticks::{ScheduledTick, TickScheduler};
use crate::world::{Layer, VoxelChange, VoxelWorld, WriteBatch};

/// Counters over the lifetime of a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Updates that ran.
    pub updates_run: u64,
    /// Updates skipped because the voxel no longer held the scheduled liquid.
    pub stale_wakes: u64,
    /// Voxel layers changed by updates.
    pub voxels_changed: u64,
    /// Voxels replaced by liquid collisions.
    pub collisions: u64,
}

/// Runs liquid updates on a world.
///
/// The simulation is the only thing that mutates liquid state. Everything
/// else (placements, neighbour changes) only asks for an update through
/// [`LiquidSimulation::on_position_disturbed`]. Time is simulation
/// milliseconds and only moves through [`LiquidSimulation::advance`].
pub struct LiquidSimulation<W: VoxelWorld, E: LiquidEffects> {
    registry: Arc<BlockRegistry>,
    world: W,
    effects: E,
    scheduler: TickScheduler,
    scratch: PathScratch,
    config: SimulationConfig,
    now: u64,
    stats: SimulationStats,
}

impl<W: VoxelWorld, E: LiquidEffects> LiquidSimulation<W, E> {
    /// Creates a simulation at time `0` with nothing scheduled.
    pub fn new(registry: Arc<BlockRegistry>, world: W, effects: E, config: SimulationConfig) -> Self {
        Self {
            registry,
            world,
            effects,
            scheduler: TickScheduler::new(),
            scratch: PathScratch::new(),
            config,
            now: 0,
            stats: SimulationStats::default(),
        }
    }

    /// Schedules an update of `pos` if it holds a liquid. Returns `true` if
    /// an update was scheduled.
    ///
    /// An update already pending for `pos` is pushed back to a full delay
    /// from now.
    pub fn on_position_disturbed(&mut self, pos: BlockPos) -> bool {
        let Some(variant) = self.liquid_at(pos) else {
            return false;
        };
        let delay = u64::from(self.registry.liquid(variant.liquid).spread_delay_ms);
        let trigger_time = self.now + delay;
        self.scheduler.schedule(pos, variant.liquid, trigger_time);
        log::trace!("Scheduled update at {pos} for {trigger_time}ms");
        true
    }

    /// Writes a voxel from outside the simulation and notifies the voxel and
    /// its neighbours.
    pub fn set_voxel(&mut self, pos: BlockPos, layer: Layer, id: BlockTypeId) {
        self.world.set_voxel(pos, layer, id);
        self.disturb_around(pos);
    }

    /// Places `level` of the liquid named `code` at `pos`.
    pub fn place_liquid(&mut self, pos: BlockPos, code: &str, level: u8) -> Result<(), SimulationError> {
        let liquid = self
            .registry
            .liquid_by_code(code)
            .ok_or_else(|| SimulationError::UnknownLiquid(code.to_string()))?;
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(SimulationError::InvalidLevel(level));
        }
        if !self.world.is_in_valid_bounds(pos) {
            return Err(SimulationError::OutOfBounds(pos));
        }
        let id = self.registry.liquid_block(liquid, level, FlowDirection::Still);
        self.set_voxel(pos, Layer::Fluid, id);
        Ok(())
    }

    /// Removes whatever liquid is at `pos`.
    pub fn remove_liquid(&mut self, pos: BlockPos) {
        self.set_voxel(pos, Layer::Fluid, BlockTypeId::AIR);
    }

    /// Moves time forward by `delta_ms` and runs the updates that come due,
    /// at most `max_updates_per_tick` of them. Returns the number run.
    pub fn advance(&mut self, delta_ms: u64) -> usize {
        let target = self.now + delta_ms;
        let _span = tracing::debug_span!("liquid_tick", now = target).entered();

        let mut processed = 0;
        while processed < self.config.max_updates_per_tick {
            let Some(tick) = self.scheduler.poll_due(target) else {
                break;
            };
            self.now = self.now.max(tick.trigger_time);
            self.run_update(tick);
            processed += 1;
        }
        self.now = target;

        if processed > 0 {
            log::debug!(
                "Ran {processed} liquid updates at {target}ms, {} pending",
                self.scheduler.count()
            );
        }
        processed
    }

    /// Advances until nothing is scheduled. Returns `false` if more than
    /// `max_updates` updates were needed.
    pub fn run_until_idle(&mut self, max_updates: usize) -> bool {
        let mut processed = 0;
        while let Some(next) = self.scheduler.next_trigger_time() {
            if processed >= max_updates {
                log::warn!("Liquids still flowing after {processed} updates");
                return false;
            }
            processed += self.advance(next.saturating_sub(self.now));
        }
        true
    }

    fn disturb_around(&mut self, pos: BlockPos) {
        self.on_position_disturbed(pos);
        for dir in Direction::ALL {
            self.on_position_disturbed(pos.relative(dir));
        }
    }

    fn run_update(&mut self, tick: ScheduledTick) {
        if self.liquid_at(tick.pos).is_none_or(|v| v.liquid != tick.liquid) {
            self.stats.stale_wakes += 1;
            log::debug!("Skipping stale update at {}", tick.pos);
            return;
        }

        let view = FluidView::new(&self.world, &*self.registry);
        let mut ctx = UpdateContext::new(view, &mut self.scratch, self.config.sound_range);
        let outcome = update_liquid(&mut ctx, tick.pos);
        let (writes, effects, collisions) = ctx.finish();
        log::trace!("Update at {}: {outcome:?}", tick.pos);

        let changes = writes.commit(&mut self.world);
        self.stats.updates_run += 1;
        self.stats.collisions += collisions as u64;
        self.stats.voxels_changed += changes.len() as u64;

        let disturbed: Vec<BlockPos> = changes
            .iter()
            .filter(|change| !self.is_flow_only(change))
            .map(|change| change.pos)
            .collect();
        for pos in disturbed {
            self.disturb_around(pos);
        }
        self.refresh_flows(tick.pos, &changes);

        for event in &effects {
            event.emit(&mut self.effects);
        }
    }

    /// Returns `true` if `change` kept the same liquid at the same level.
    fn is_flow_only(&self, change: &VoxelChange) -> bool {
        let old = self.registry.get(change.old).liquid;
        let new = self.registry.get(change.new).liquid;
        matches!(
            (old, new),
            (Some(old), Some(new)) if old.liquid == new.liquid && old.level == new.level
        )
    }

    /// Re-derives flow variants around an update. These writes do not
    /// schedule anything.
    fn refresh_flows(&mut self, center: BlockPos, changes: &[VoxelChange]) {
        let mut seen = FxHashSet::default();
        let mut targets = Vec::new();
        for base in iter::once(center).chain(changes.iter().map(|change| change.pos)) {
            let around = Cardinal::ALL
                .into_iter()
                .map(|cardinal| base.relative_cardinal(cardinal))
                .chain([base, base.above(), base.below()]);
            for pos in around {
                if seen.insert(pos) {
                    targets.push(pos);
                }
            }
        }

        let view = FluidView::new(&self.world, &*self.registry);
        let mut batch = WriteBatch::new();
        for pos in targets {
            let Some(variant) = view.liquid(pos) else {
                continue;
            };
            let flow = resolve_flow_direction(view, pos, variant.liquid, variant.level);
            if flow != variant.flow {
                let id = self.registry.liquid_block(variant.liquid, variant.level, flow);
                batch.set(pos, Layer::Fluid, id);
            }
        }
        batch.commit(&mut self.world);
    }

    /// The liquid at `pos`.
    #[must_use]
    pub fn liquid_at(&self, pos: BlockPos) -> Option<LiquidVariant> {
        self.registry.get(self.world.get_voxel(pos, Layer::Fluid)).liquid
    }

    /// The level of `liquid` at `pos`, `0` if absent.
    #[must_use]
    pub fn level_at(&self, pos: BlockPos, liquid: LiquidId) -> u8 {
        self.liquid_at(pos)
            .filter(|variant| variant.liquid == liquid)
            .map_or(0, |variant| variant.level)
    }

    /// The world.
    pub const fn world(&self) -> &W {
        &self.world
    }

    /// Mutable world access. Edits made here notify nothing.
    pub const fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// The effects sink.
    pub const fn effects(&self) -> &E {
        &self.effects
    }

    /// The block registry.
    pub const fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// The update queue.
    pub const fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// The config.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current simulation time in milliseconds.
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Number of pending updates.
    pub fn pending_updates(&self) -> usize {
        self.scheduler.count()
    }

    /// Lifetime counters.
    pub const fn stats(&self) -> SimulationStats {
        self.stats
    }
}
