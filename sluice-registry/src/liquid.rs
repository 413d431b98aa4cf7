//! Liquid identities, levels and flow variants.

use serde::{Deserialize, Serialize};
use sluice_utils::Direction;

use crate::blocks::BlockTypeId;

/// Highest liquid level. A voxel at this level is a source.
pub const MAX_LEVEL: u8 = 7;

/// Voxel types at or above this `replaceable` score are soft enough for any
/// liquid to overwrite.
pub const REPLACEABLE_THRESHOLD: u16 = 6000;

/// Index of a liquid family in the registry. Two voxels hold the same liquid
/// iff their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiquidId(pub u16);

/// The rendered/behavioural flow variant of a liquid voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlowDirection {
    /// Flowing towards -z.
    North = 0,
    /// Flowing towards +x.
    East = 1,
    /// Flowing towards +z.
    South = 2,
    /// Flowing towards -x.
    West = 3,
    /// Falling / down-facing.
    Down = 4,
    /// Not flowing.
    Still = 5,
}

impl FlowDirection {
    /// All variants in registry order.
    pub const ALL: [FlowDirection; 6] = [
        FlowDirection::North,
        FlowDirection::East,
        FlowDirection::South,
        FlowDirection::West,
        FlowDirection::Down,
        FlowDirection::Still,
    ];

    /// Code fragment used in generated block codes.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            FlowDirection::North => "n",
            FlowDirection::East => "e",
            FlowDirection::South => "s",
            FlowDirection::West => "w",
            FlowDirection::Down => "d",
            FlowDirection::Still => "still",
        }
    }

    /// The flow matching a horizontal face. Vertical faces have none.
    #[must_use]
    pub const fn from_horizontal(direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => Some(FlowDirection::North),
            Direction::East => Some(FlowDirection::East),
            Direction::South => Some(FlowDirection::South),
            Direction::West => Some(FlowDirection::West),
            Direction::Up | Direction::Down => None,
        }
    }
}

/// The liquid view of a fluid-layer voxel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiquidVariant {
    /// Which liquid this is.
    pub liquid: LiquidId,
    /// Level in `1..=MAX_LEVEL`.
    pub level: u8,
    /// Derived flow variant.
    pub flow: FlowDirection,
}

impl LiquidVariant {
    /// Returns true if this voxel is an inexhaustible source.
    #[inline]
    #[must_use]
    pub const fn is_source(&self) -> bool {
        self.level == MAX_LEVEL
    }

    /// Returns true if both voxels hold the same liquid.
    #[inline]
    #[must_use]
    pub fn is_same_liquid(&self, other: &LiquidVariant) -> bool {
        self.liquid == other.liquid
    }
}

/// Static per-liquid configuration, resolved against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidConfig {
    /// Liquid family code, e.g. `water`.
    pub code: String,
    /// Softness score shared by every variant of this liquid.
    pub replaceable: u16,
    /// Delay between a disturbance and the scheduled update.
    pub spread_delay_ms: u32,
    /// The liquid this one turns into something else on contact.
    pub collides_with: Option<LiquidId>,
    /// What a collided source voxel becomes.
    pub source_replacement: Option<BlockTypeId>,
    /// What a collided flowing voxel becomes.
    pub flowing_replacement: Option<BlockTypeId>,
    /// Sound played when a collision replaces a voxel.
    pub collision_sound: Option<String>,
}
