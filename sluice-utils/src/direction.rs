//! Block faces and horizontal compass directions.

use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// One of the six faces of a block.
///
/// North is -z, south is +z, east is +x and west is -x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// -y
    Down,
    /// +y
    Up,
    /// -z
    North,
    /// +z
    South,
    /// -x
    West,
    /// +x
    East,
}

impl Direction {
    /// All six faces, in index order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The four horizontal faces, clockwise from north.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Stable index of this face, usable for per-face arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The face pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Unit offset of this face.
    #[must_use]
    pub const fn normal(self) -> Vector3<i32> {
        match self {
            Direction::Down => Vector3::new(0, -1, 0),
            Direction::Up => Vector3::new(0, 1, 0),
            Direction::North => Vector3::new(0, 0, -1),
            Direction::South => Vector3::new(0, 0, 1),
            Direction::West => Vector3::new(-1, 0, 0),
            Direction::East => Vector3::new(1, 0, 0),
        }
    }

    /// Returns true for the four horizontal faces.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Down | Direction::Up)
    }
}

/// The eight horizontal compass directions (cardinals and diagonals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    /// -z
    North,
    /// +x -z
    NorthEast,
    /// +x
    East,
    /// +x +z
    SouthEast,
    /// +z
    South,
    /// -x +z
    SouthWest,
    /// -x
    West,
    /// -x -z
    NorthWest,
}

impl Cardinal {
    /// All eight directions, clockwise from north.
    pub const ALL: [Cardinal; 8] = [
        Cardinal::North,
        Cardinal::NorthEast,
        Cardinal::East,
        Cardinal::SouthEast,
        Cardinal::South,
        Cardinal::SouthWest,
        Cardinal::West,
        Cardinal::NorthWest,
    ];

    /// The four diagonal directions.
    pub const DIAGONALS: [Cardinal; 4] = [
        Cardinal::NorthEast,
        Cardinal::SouthEast,
        Cardinal::SouthWest,
        Cardinal::NorthWest,
    ];

    /// Horizontal unit offset (y is always 0).
    #[must_use]
    pub const fn normal(self) -> Vector3<i32> {
        match self {
            Cardinal::North => Vector3::new(0, 0, -1),
            Cardinal::NorthEast => Vector3::new(1, 0, -1),
            Cardinal::East => Vector3::new(1, 0, 0),
            Cardinal::SouthEast => Vector3::new(1, 0, 1),
            Cardinal::South => Vector3::new(0, 0, 1),
            Cardinal::SouthWest => Vector3::new(-1, 0, 1),
            Cardinal::West => Vector3::new(-1, 0, 0),
            Cardinal::NorthWest => Vector3::new(-1, 0, -1),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Cardinal::North => Cardinal::South,
            Cardinal::NorthEast => Cardinal::SouthWest,
            Cardinal::East => Cardinal::West,
            Cardinal::SouthEast => Cardinal::NorthWest,
            Cardinal::South => Cardinal::North,
            Cardinal::SouthWest => Cardinal::NorthEast,
            Cardinal::West => Cardinal::East,
            Cardinal::NorthWest => Cardinal::SouthEast,
        }
    }

    /// Returns true for the four diagonals.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Cardinal::NorthEast | Cardinal::SouthEast | Cardinal::SouthWest | Cardinal::NorthWest
        )
    }

    /// The block face matching this direction, `None` for diagonals.
    #[must_use]
    pub const fn as_direction(self) -> Option<Direction> {
        match self {
            Cardinal::North => Some(Direction::North),
            Cardinal::East => Some(Direction::East),
            Cardinal::South => Some(Direction::South),
            Cardinal::West => Some(Direction::West),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_cancel() {
        for dir in Direction::ALL {
            assert_eq!(dir.normal() + dir.opposite().normal(), Vector3::new(0, 0, 0));
            assert_eq!(dir.opposite().opposite(), dir);
        }
        for card in Cardinal::ALL {
            assert_eq!(card.normal() + card.opposite().normal(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn test_diagonals() {
        assert_eq!(Cardinal::ALL.iter().filter(|c| c.is_diagonal()).count(), 4);
        assert_eq!(Cardinal::East.as_direction(), Some(Direction::East));
        assert_eq!(Cardinal::NorthEast.as_direction(), None);
    }
}
