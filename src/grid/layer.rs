//! One maze level: its cells plus all per-traversal bookkeeping.

use crate::error::{OublietteError, Result};
use crate::factory::RoomHandle;
use crate::grid::cell::{Cell, Direction, GridPos, DIRECTIONS};

/// A full maze grid instance.
///
/// Cells are addressed by index (`z * size + x`) rather than by reference so
/// that traversal state can borrow the layer mutably without aliasing. The
/// stack doubles as the active backtracking path; `longest_path` is always a
/// value copy taken at the deepest point, never a view of the stack.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    size: usize,
    cells: Vec<Cell>,
    /// Active backtracking path, entrance at the bottom (LIFO).
    pub stack: Vec<usize>,
    /// Copy of `stack` at the moment it was longest.
    pub longest_path: Vec<usize>,
    /// Cells where traversal could advance no further.
    pub deadends: Vec<usize>,
    /// Cell ending the longest discovered path.
    pub end_cell: Option<usize>,
    /// Door teardowns deferred until traversal completes.
    pub pending_doors: Vec<(RoomHandle, Direction)>,
    /// Traversal cursor.
    pub current: Option<usize>,
}

impl Layer {
    /// Create an empty layer populated with `size * size` unvisited cells.
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(OublietteError::GridTooSmall { size });
        }

        let mut cells = Vec::with_capacity(size * size);
        for z in 0..size {
            for x in 0..size {
                cells.push(Cell::new(GridPos::new(x, z)));
            }
        }

        Ok(Self {
            size,
            cells,
            ..Self::default()
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Cell index at `pos`, or `None` outside the grid.
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        (pos.x < self.size && pos.z < self.size).then(|| pos.index(self.size))
    }

    /// Indices of the unvisited grid-adjacent neighbors of `index`, in
    /// doorway order (N, E, S, W). Diagonal moves are excluded by
    /// construction.
    pub fn unvisited_neighbors(&self, index: usize) -> Vec<usize> {
        let pos = self.cells[index].pos;
        DIRECTIONS
            .into_iter()
            .filter_map(|dir| dir.step(pos, self.size))
            .map(|p| p.index(self.size))
            .filter(|&i| !self.cells[i].visited)
            .collect()
    }

    /// Open the shared wall between two adjacent cells, setting both doorway
    /// bits of the pair. Returns the direction from `a` toward `b`.
    ///
    /// Exactly one axis differs between adjacent cells; a non-adjacent pair
    /// is a generation bug.
    pub fn open_wall_pair(&mut self, a: usize, b: usize) -> Result<Direction> {
        let (pa, pb) = (self.cells[a].pos, self.cells[b].pos);
        let dir = DIRECTIONS
            .into_iter()
            .find(|d| d.step(pa, self.size) == Some(pb))
            .ok_or_else(|| OublietteError::GenerationError {
                reason: format!("cells ({},{}) and ({},{}) are not adjacent", pa.x, pa.z, pb.x, pb.z),
            })?;

        self.cells[a].doorways[dir.index()] = true;
        self.cells[b].doorways[dir.opposite().index()] = true;
        Ok(dir)
    }

    /// Every room handle currently bound to a cell of this layer.
    pub fn room_handles(&self) -> Vec<RoomHandle> {
        self.cells.iter().filter_map(|c| c.room).collect()
    }

    /// Number of cells marked visited.
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    /// Number of opened wall pairs (each pair counted once).
    pub fn doorway_pair_count(&self) -> usize {
        let total: usize = self
            .cells
            .iter()
            .map(|c| c.doorways.iter().filter(|&&d| d).count())
            .sum();
        // The outward entrance doorway has no partner cell, so it
        // contributes an odd bit.
        total / 2
    }

    /// Render the doorway layout as ASCII, one `#`/space character per wall.
    pub fn to_ascii(&self) -> String {
        let n = self.size;
        let mut out = String::new();
        for z in 0..n {
            // north walls of this row
            for x in 0..n {
                let cell = self.cell(GridPos::new(x, z).index(n));
                out.push('#');
                out.push(if cell.has_doorway(Direction::North) { ' ' } else { '#' });
            }
            out.push_str("#\n");
            // west walls and cell bodies
            for x in 0..n {
                let cell = self.cell(GridPos::new(x, z).index(n));
                out.push(if cell.has_doorway(Direction::West) { ' ' } else { '#' });
                out.push(if cell.visited { ' ' } else { '.' });
            }
            let last = self.cell(GridPos::new(n - 1, z).index(n));
            out.push(if last.has_doorway(Direction::East) { ' ' } else { '#' });
            out.push('\n');
        }
        // south boundary
        for _ in 0..n {
            out.push_str("##");
        }
        out.push_str("#\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_undersized_grid() {
        assert!(matches!(
            Layer::new(1),
            Err(OublietteError::GridTooSmall { size: 1 })
        ));
        assert!(Layer::new(2).is_ok());
    }

    #[test]
    fn test_one_cell_per_coordinate() {
        let layer = Layer::new(4).unwrap();
        assert_eq!(layer.cells().len(), 16);
        for z in 0..4 {
            for x in 0..4 {
                let pos = GridPos::new(x, z);
                assert_eq!(layer.cell(pos.index(4)).pos, pos);
            }
        }
    }

    #[test]
    fn test_unvisited_neighbors_shrink_as_cells_are_visited() {
        let mut layer = Layer::new(3).unwrap();
        let center = GridPos::new(1, 1).index(3);
        assert_eq!(layer.unvisited_neighbors(center).len(), 4);

        let north = GridPos::new(1, 0).index(3);
        layer.cell_mut(north).visited = true;
        let neighbors = layer.unvisited_neighbors(center);
        assert_eq!(neighbors.len(), 3);
        assert!(!neighbors.contains(&north));
    }

    #[test]
    fn test_corner_has_two_neighbors() {
        let layer = Layer::new(3).unwrap();
        let corner = GridPos::new(0, 0).index(3);
        assert_eq!(layer.unvisited_neighbors(corner).len(), 2);
    }

    #[test]
    fn test_open_wall_pair_is_symmetric() {
        let mut layer = Layer::new(3).unwrap();
        let a = GridPos::new(1, 1).index(3);
        let b = GridPos::new(1, 2).index(3);
        let dir = layer.open_wall_pair(a, b).unwrap();
        assert_eq!(dir, Direction::South);
        assert!(layer.cell(a).has_doorway(Direction::South));
        assert!(layer.cell(b).has_doorway(Direction::North));
    }

    #[test]
    fn test_open_wall_pair_rejects_non_adjacent() {
        let mut layer = Layer::new(3).unwrap();
        let a = GridPos::new(0, 0).index(3);
        let b = GridPos::new(2, 2).index(3);
        assert!(layer.open_wall_pair(a, b).is_err());
    }
}
