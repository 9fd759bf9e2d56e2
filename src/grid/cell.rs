//! Grid positions, directions and the maze cell.

use serde::{Deserialize, Serialize};

use crate::factory::RoomHandle;

/// A coordinate on the maze grid, 0-indexed and row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: usize,
    pub z: usize,
}

impl GridPos {
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Row-major index into a `size * size` cell vector.
    pub fn index(&self, size: usize) -> usize {
        self.z * size + self.x
    }
}

/// The four cardinal wall directions of a cell.
///
/// North decreases `z`, South increases it; East increases `x`, West
/// decreases it. The discriminant doubles as the doorway array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// All four directions in doorway-index order.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Doorway array index for this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing back across the same wall.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Neighbor position one step in this direction, or `None` when the step
    /// would leave the `size * size` grid.
    pub fn step(self, pos: GridPos, size: usize) -> Option<GridPos> {
        let (x, z) = (pos.x, pos.z);
        let stepped = match self {
            Direction::North => (Some(x), z.checked_sub(1)),
            Direction::East => (x.checked_add(1), Some(z)),
            Direction::South => (Some(x), z.checked_add(1)),
            Direction::West => (x.checked_sub(1), Some(z)),
        };
        match stepped {
            (Some(x), Some(z)) if x < size && z < size => Some(GridPos { x, z }),
            _ => None,
        }
    }

    /// Yaw in degrees for a transition room whose entrance faces this
    /// direction.
    pub fn entrance_yaw(self) -> f32 {
        match self {
            Direction::North => 180.0,
            Direction::East => 270.0,
            Direction::South => 0.0,
            Direction::West => 90.0,
        }
    }
}

/// A facet of a room that tiles can be queried from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Middle,
    North,
    East,
    South,
    West,
}

impl From<Direction> for Side {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::North => Side::North,
            Direction::East => Side::East,
            Direction::South => Side::South,
            Direction::West => Side::West,
        }
    }
}

/// One node of the maze grid.
///
/// The room handle is externally owned; the cell only remembers it so walls
/// and tiles can be addressed through the factory later.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub pos: GridPos,
    pub visited: bool,
    /// Indexed North=0, East=1, South=2, West=3; `true` means the wall has
    /// been removed and the cell is passable in that direction.
    pub doorways: [bool; 4],
    pub room: Option<RoomHandle>,
}

impl Cell {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    /// Whether this cell is open toward `dir`.
    pub fn has_doorway(&self, dir: Direction) -> bool {
        self.doorways[dir.index()]
    }

    /// The first open doorway of this cell, scanning N, E, S, W.
    pub fn first_doorway(&self) -> Option<Direction> {
        DIRECTIONS.into_iter().find(|d| self.has_doorway(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stays_in_bounds() {
        let origin = GridPos::new(0, 0);
        assert_eq!(Direction::North.step(origin, 4), None);
        assert_eq!(Direction::West.step(origin, 4), None);
        assert_eq!(Direction::East.step(origin, 4), Some(GridPos::new(1, 0)));
        assert_eq!(Direction::South.step(origin, 4), Some(GridPos::new(0, 1)));

        let corner = GridPos::new(3, 3);
        assert_eq!(Direction::East.step(corner, 4), None);
        assert_eq!(Direction::South.step(corner, 4), None);
    }

    #[test]
    fn test_opposite_is_involutive() {
        for dir in DIRECTIONS {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_row_major_index() {
        assert_eq!(GridPos::new(3, 2).index(5), 13);
        assert_eq!(GridPos::new(0, 0).index(5), 0);
    }

    #[test]
    fn test_first_doorway_scan_order() {
        let mut cell = Cell::new(GridPos::new(1, 1));
        cell.doorways[Direction::South.index()] = true;
        cell.doorways[Direction::East.index()] = true;
        assert_eq!(cell.first_doorway(), Some(Direction::East));
    }
}
