//! Debounced tick queue.

use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use sluice_registry::LiquidId;
use sluice_utils::BlockPos;

use super::ScheduledTick;

/// Heap entries left behind by rescheduling are purged once they outnumber
/// live entries by this factor.
const COMPACT_RATIO: usize = 4;

/// Time-ordered queue of liquid updates, at most one pending per position.
///
/// Scheduling a position that already has a pending update replaces it: the
/// new trigger time wins. The replaced heap entry is left in place and
/// skipped when it surfaces.
pub struct TickScheduler {
    /// Priority queue of scheduled ticks, possibly holding superseded entries.
    tick_queue: BinaryHeap<ScheduledTick>,
    /// The live tick for every pending position.
    pending: FxHashMap<BlockPos, ScheduledTick>,
    /// Incremented for each scheduled tick.
    next_sub_tick_order: u64,
}

impl TickScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_queue: BinaryHeap::new(),
            pending: FxHashMap::default(),
            next_sub_tick_order: 0,
        }
    }

    /// Schedules an update of `pos` at `trigger_time`, replacing any pending
    /// one.
    ///
    /// Returns `true` if the position had nothing pending.
    pub fn schedule(&mut self, pos: BlockPos, liquid: LiquidId, trigger_time: u64) -> bool {
        let tick = ScheduledTick::new(liquid, pos, trigger_time, self.next_sub_tick_order);
        self.next_sub_tick_order += 1;

        let fresh = self.pending.insert(pos, tick).is_none();
        self.tick_queue.push(tick);
        if !fresh {
            log::trace!("Debounced update at {pos} to {trigger_time}ms");
            self.maybe_compact();
        }
        fresh
    }

    /// Removes and returns the next tick due at or before `now`.
    pub fn poll_due(&mut self, now: u64) -> Option<ScheduledTick> {
        while let Some(top) = self.tick_queue.peek() {
            if top.trigger_time > now {
                return None;
            }
            let tick = self.tick_queue.pop()?;
            if self.is_live(&tick) {
                self.pending.remove(&tick.pos);
                return Some(tick);
            }
        }
        None
    }

    /// Cancels the pending update of `pos`, if any.
    pub fn cancel(&mut self, pos: BlockPos) -> bool {
        self.pending.remove(&pos).is_some()
    }

    /// Checks if an update is pending for `pos`.
    #[must_use]
    pub fn has_scheduled(&self, pos: BlockPos) -> bool {
        self.pending.contains_key(&pos)
    }

    /// The pending tick for `pos`.
    #[must_use]
    pub fn get(&self, pos: BlockPos) -> Option<&ScheduledTick> {
        self.pending.get(&pos)
    }

    /// Earliest trigger time among pending updates.
    ///
    /// Superseded entries found at the head of the queue are dropped.
    pub fn next_trigger_time(&mut self) -> Option<u64> {
        while let Some(top) = self.tick_queue.peek() {
            if self.is_live(top) {
                return Some(top.trigger_time);
            }
            self.tick_queue.pop();
        }
        None
    }

    /// Number of pending updates.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending update.
    pub fn clear(&mut self) {
        self.tick_queue.clear();
        self.pending.clear();
    }

    fn is_live(&self, tick: &ScheduledTick) -> bool {
        self.pending
            .get(&tick.pos)
            .is_some_and(|live| live.sub_tick_order == tick.sub_tick_order)
    }

    fn maybe_compact(&mut self) {
        if self.tick_queue.len() > COMPACT_RATIO * self.pending.len().max(16) {
            let pending = &self.pending;
            self.tick_queue.retain(|tick| {
                pending
                    .get(&tick.pos)
                    .is_some_and(|live| live.sub_tick_order == tick.sub_tick_order)
            });
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: LiquidId = LiquidId(0);

    #[test]
    fn test_schedule_and_poll() {
        let mut ticks = TickScheduler::new();
        let pos = BlockPos::new(10, 64, 20);

        assert!(ticks.schedule(pos, WATER, 100));
        assert_eq!(ticks.count(), 1);
        assert!(ticks.poll_due(99).is_none());

        let polled = ticks.poll_due(100).expect("should have a tick");
        assert_eq!(polled.pos, pos);
        assert_eq!(ticks.count(), 0);
        assert!(!ticks.has_scheduled(pos));
    }

    #[test]
    fn test_debounce_keeps_last() {
        let mut ticks = TickScheduler::new();
        let pos = BlockPos::new(0, 0, 0);

        assert!(ticks.schedule(pos, WATER, 100));
        assert!(!ticks.schedule(pos, WATER, 120));
        assert!(!ticks.schedule(pos, WATER, 150));
        assert_eq!(ticks.count(), 1);
        assert_eq!(ticks.next_trigger_time(), Some(150));

        // The superseded entries never fire.
        assert!(ticks.poll_due(149).is_none());
        let polled = ticks.poll_due(1000).expect("one tick");
        assert_eq!(polled.trigger_time, 150);
        assert!(ticks.poll_due(1000).is_none());
    }

    #[test]
    fn test_ordering() {
        let mut ticks = TickScheduler::new();
        ticks.schedule(BlockPos::new(0, 0, 0), WATER, 200);
        ticks.schedule(BlockPos::new(1, 0, 0), WATER, 100);
        ticks.schedule(BlockPos::new(2, 0, 0), WATER, 150);
        ticks.schedule(BlockPos::new(3, 0, 0), WATER, 100);

        let order: Vec<_> = std::iter::from_fn(|| ticks.poll_due(u64::MAX))
            .map(|tick| tick.pos.x())
            .collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_cancel() {
        let mut ticks = TickScheduler::new();
        let pos = BlockPos::new(5, 5, 5);
        ticks.schedule(pos, WATER, 10);
        assert!(ticks.cancel(pos));
        assert!(!ticks.cancel(pos));
        assert!(ticks.poll_due(100).is_none());
        assert!(ticks.is_empty());
    }

    #[test]
    fn test_next_trigger_time_skips_superseded() {
        let mut ticks = TickScheduler::new();
        let early = BlockPos::new(0, 0, 0);
        let late = BlockPos::new(1, 0, 0);
        ticks.schedule(early, WATER, 50);
        ticks.schedule(late, WATER, 300);
        assert_eq!(ticks.next_trigger_time(), Some(50));

        // Pushed back past the other position.
        ticks.schedule(early, WATER, 400);
        assert_eq!(ticks.next_trigger_time(), Some(300));

        ticks.cancel(late);
        assert_eq!(ticks.next_trigger_time(), Some(400));
        ticks.cancel(early);
        assert_eq!(ticks.next_trigger_time(), None);
    }

    #[test]
    fn test_compaction_keeps_live_ticks() {
        let mut ticks = TickScheduler::new();
        let pos = BlockPos::new(0, 0, 0);
        for time in 0..500 {
            ticks.schedule(pos, WATER, time);
        }
        assert_eq!(ticks.count(), 1);
        let polled = ticks.poll_due(u64::MAX).expect("live tick survives");
        assert_eq!(polled.trigger_time, 499);
    }
}
