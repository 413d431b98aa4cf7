//! Scheduled tick type.

use std::cmp::Ordering;

use sluice_registry::LiquidId;
use sluice_utils::BlockPos;

/// A pending liquid update.
///
/// Ticks that fire at the same millisecond run in scheduling order.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTick {
    /// The liquid expected at `pos` when the tick fires.
    pub liquid: LiquidId,
    /// The position to update.
    pub pos: BlockPos,
    /// Simulation time, in milliseconds, at which the tick fires.
    pub trigger_time: u64,
    /// Ordering for ticks with the same `trigger_time`. Lower values run first.
    pub sub_tick_order: u64,
}

impl ScheduledTick {
    /// Creates a new scheduled tick.
    #[must_use]
    pub const fn new(liquid: LiquidId, pos: BlockPos, trigger_time: u64, sub_tick_order: u64) -> Self {
        Self {
            liquid,
            pos,
            trigger_time,
            sub_tick_order,
        }
    }
}

impl PartialEq for ScheduledTick {
    fn eq(&self, other: &Self) -> bool {
        self.trigger_time == other.trigger_time && self.sub_tick_order == other.sub_tick_order
    }
}

impl Eq for ScheduledTick {}

impl PartialOrd for ScheduledTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTick {
    /// `BinaryHeap` is a max-heap, so the comparison is reversed to get the
    /// earliest tick first.
    fn cmp(&self, other: &Self) -> Ordering {
        match other.trigger_time.cmp(&self.trigger_time) {
            Ordering::Equal => {}
            ord => return ord,
        }
        other.sub_tick_order.cmp(&self.sub_tick_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_ordering() {
        let pos = BlockPos::new(0, 0, 0);
        let water = LiquidId(0);

        // Earlier trigger_time should come first
        let tick1 = ScheduledTick::new(water, pos, 100, 0);
        let tick2 = ScheduledTick::new(water, pos, 200, 0);
        assert!(tick1 > tick2);

        // Same trigger_time, lower sub_tick_order should come first
        let tick3 = ScheduledTick::new(water, pos, 100, 5);
        let tick4 = ScheduledTick::new(water, pos, 100, 10);
        assert!(tick3 > tick4);
    }
}
