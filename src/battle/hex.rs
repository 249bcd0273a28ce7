//! Hex coordinate system for battle maps
//!
//! Cells are addressed by offset (col, row); odd rows sit half a hex to the
//! right. Cube coordinates exist only for distance and neighbor math and are
//! always derived from a `Cell`. Every distance, adjacency and neighbor
//! question in the crate goes through this module.

use serde::{Deserialize, Serialize};

/// A grid position in offset coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Convert to cube coordinates: x = col - floor(row/2), z = row
    pub fn to_cube(&self) -> CubeCoord {
        let x = self.col - self.row.div_euclid(2);
        let z = self.row;
        CubeCoord { x, y: -x - z, z }
    }

    /// Inverse of `to_cube`
    pub fn from_cube(cube: CubeCoord) -> Self {
        Self {
            col: cube.x + cube.z.div_euclid(2),
            row: cube.z,
        }
    }

    /// Hex distance (number of steps on an unbounded grid)
    pub fn distance(&self, other: &Self) -> u32 {
        self.to_cube().distance(&other.to_cube())
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }

    /// Neighbor in a direction, ignoring grid bounds
    pub fn neighbor(&self, direction: HexDirection) -> Self {
        Self::from_cube(self.to_cube().neighbor(direction))
    }

    /// All 6 neighbors, ignoring grid bounds
    pub fn unbounded_neighbors(&self) -> [Cell; 6] {
        HexDirection::all().map(|d| self.neighbor(d))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Cube coordinate, x + y + z == 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    /// Returns None if the components do not sum to zero
    pub fn new(x: i32, y: i32, z: i32) -> Option<Self> {
        (x + y + z == 0).then_some(Self { x, y, z })
    }

    /// Chebyshev distance between cube coordinates
    pub fn distance(&self, other: &Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        let dz = (self.z - other.z).unsigned_abs();
        dx.max(dy).max(dz)
    }

    pub fn neighbor(&self, direction: HexDirection) -> Self {
        let (dx, dy, dz) = direction.cube_offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// The six hex directions (z grows downward, so "north" is row - 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Cube offset (dx, dy, dz) for this direction
    pub fn cube_offset(&self) -> (i32, i32, i32) {
        match self {
            HexDirection::East => (1, -1, 0),
            HexDirection::NorthEast => (1, 0, -1),
            HexDirection::NorthWest => (0, 1, -1),
            HexDirection::West => (-1, 1, 0),
            HexDirection::SouthWest => (-1, 0, 1),
            HexDirection::SouthEast => (0, -1, 1),
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

/// Rectangular grid bounds: 0 <= col < cols, 0 <= row < rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    pub cols: u32,
    pub rows: u32,
}

impl GridBounds {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.row >= 0 && (cell.col as u32) < self.cols && (cell.row as u32) < self.rows
    }

    /// In-bounds neighbors of a cell, in `HexDirection::all()` order
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        cell.unbounded_neighbors()
            .into_iter()
            .filter(|n| self.contains(*n))
            .collect()
    }

    /// Every cell of the grid, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32).flat_map(move |row| (0..self.cols as i32).map(move |col| Cell::new(col, row)))
    }

    pub fn cell_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_invariant() {
        for cell in GridBounds::new(6, 6).cells() {
            let c = cell.to_cube();
            assert_eq!(c.x + c.y + c.z, 0);
            assert_eq!(Cell::from_cube(c), cell);
        }
    }

    #[test]
    fn test_cube_new_rejects_bad_sum() {
        assert!(CubeCoord::new(1, 1, 1).is_none());
        assert!(CubeCoord::new(1, -1, 0).is_some());
    }

    #[test]
    fn test_hex_distance_same() {
        let a = Cell::new(3, 3);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_distance_along_row() {
        let origin = Cell::new(2, 2);
        assert_eq!(origin.distance(&Cell::new(5, 2)), 3);
        assert_eq!(origin.distance(&Cell::new(6, 2)), 4);
    }

    #[test]
    fn test_distance_is_not_euclidean() {
        // Straight down three rows from an even row drifts half a hex per row
        let a = Cell::new(0, 0);
        assert_eq!(a.distance(&Cell::new(0, 3)), 3);
        assert_eq!(a.distance(&Cell::new(1, 3)), 3);
        assert_eq!(a.distance(&Cell::new(3, 3)), 5);
    }

    #[test]
    fn test_neighbors_depend_on_row_parity() {
        let bounds = GridBounds::new(10, 10);

        let mut even = bounds.neighbors(Cell::new(4, 4));
        even.sort_by_key(|c| (c.row, c.col));
        assert_eq!(
            even,
            vec![
                Cell::new(3, 3),
                Cell::new(4, 3),
                Cell::new(3, 4),
                Cell::new(5, 4),
                Cell::new(3, 5),
                Cell::new(4, 5),
            ]
        );

        let mut odd = bounds.neighbors(Cell::new(4, 5));
        odd.sort_by_key(|c| (c.row, c.col));
        assert_eq!(
            odd,
            vec![
                Cell::new(4, 4),
                Cell::new(5, 4),
                Cell::new(3, 5),
                Cell::new(5, 5),
                Cell::new(4, 6),
                Cell::new(5, 6),
            ]
        );
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let bounds = GridBounds::new(8, 8);
        for cell in bounds.cells() {
            for n in bounds.neighbors(cell) {
                assert!(cell.is_adjacent(&n), "{} / {}", cell, n);
            }
        }
    }

    #[test]
    fn test_corner_neighbors_filtered() {
        let bounds = GridBounds::new(10, 8);
        let corner = bounds.neighbors(Cell::new(0, 0));
        assert_eq!(corner.len(), 2);
        assert!(corner.iter().all(|c| bounds.contains(*c)));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = GridBounds::new(10, 8);
        assert!(bounds.contains(Cell::new(9, 7)));
        assert!(!bounds.contains(Cell::new(10, 7)));
        assert!(!bounds.contains(Cell::new(-1, 0)));
        assert_eq!(bounds.cells().count(), bounds.cell_count());
    }

    #[test]
    fn test_direction_opposite() {
        for d in HexDirection::all() {
            let cell = Cell::new(5, 5);
            assert_eq!(cell.neighbor(d).neighbor(d.opposite()), cell);
        }
    }
}
