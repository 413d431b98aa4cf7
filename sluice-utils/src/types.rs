// Wrapper types making it harder to accidentaly use the wrong underlying type.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::direction::{Cardinal, Direction};
use crate::math::{Vector2, Vector3};

/// A block (voxel) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// The z coordinate.
    #[inline]
    #[must_use]
    pub const fn z(self) -> i32 {
        self.0.z
    }

    /// Returns this position moved by the given amounts.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// Returns this position moved by a horizontal footprint offset.
    #[inline]
    #[must_use]
    pub const fn offset_horizontal(self, offset: Vector2<i32>) -> Self {
        self.offset(offset.x, 0, offset.y)
    }

    /// The position one block up.
    #[inline]
    #[must_use]
    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The position one block down.
    #[inline]
    #[must_use]
    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The neighbouring position in the given direction.
    #[inline]
    #[must_use]
    pub fn relative(self, direction: Direction) -> Self {
        let normal = direction.normal();
        self.offset(normal.x, normal.y, normal.z)
    }

    /// The horizontal neighbour in the given compass direction.
    #[inline]
    #[must_use]
    pub fn relative_cardinal(self, cardinal: Cardinal) -> Self {
        let normal = cardinal.normal();
        self.offset(normal.x, 0, normal.z)
    }

    /// Manhattan distance over all three axes.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.0.x - other.0.x).abs() + (self.0.y - other.0.y).abs() + (self.0.z - other.0.z).abs()
    }

    /// The face of `self` that touches `neighbor`, if the two are adjacent.
    #[must_use]
    pub fn facing_towards(self, neighbor: Self) -> Option<Direction> {
        let delta = neighbor.0 - self.0;
        Direction::ALL.into_iter().find(|dir| dir.normal() == delta)
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_facing() {
        let pos = BlockPos::new(4, 10, -2);
        let east = pos.relative(Direction::East);
        assert_eq!(east, BlockPos::new(5, 10, -2));
        assert_eq!(pos.facing_towards(east), Some(Direction::East));
        assert_eq!(pos.facing_towards(pos.below()), Some(Direction::Down));
        assert_eq!(pos.facing_towards(pos.offset(1, 0, 1)), None);
    }

    #[test]
    fn test_manhattan_distance() {
        let a = BlockPos::new(0, 0, 0);
        assert_eq!(a.manhattan_distance(BlockPos::new(3, -1, 2)), 6);
        assert_eq!(a.manhattan_distance(a), 0);
    }
}
