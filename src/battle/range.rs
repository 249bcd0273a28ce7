//! Range and area-of-effect queries
//!
//! Breadth-first expansion over in-bounds neighbors. On a rectangular
//! offset grid a shortest hex path between two in-bounds cells never has to
//! leave the rectangle, so the BFS hop count equals `Cell::distance`.

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::battle::hex::{Cell, GridBounds};

/// All in-bounds cells within `radius` steps of `origin`, origin included
///
/// Empty when the origin itself is off the grid.
pub fn cells_within_range(bounds: &GridBounds, origin: Cell, radius: u32) -> AHashSet<Cell> {
    let mut visited = AHashSet::new();
    if !bounds.contains(origin) {
        return visited;
    }

    let mut frontier = VecDeque::new();
    visited.insert(origin);
    frontier.push_back((origin, 0u32));

    while let Some((cell, depth)) = frontier.pop_front() {
        if depth == radius {
            continue;
        }
        for neighbor in bounds.neighbors(cell) {
            if visited.insert(neighbor) {
                frontier.push_back((neighbor, depth + 1));
            }
        }
    }

    debug_assert!(visited.iter().all(|c| origin.distance(c) <= radius));
    visited
}

/// Cells hit by an effect landing on `center`; radius 0 is the center alone
pub fn cells_in_aoe(bounds: &GridBounds, center: Cell, radius: u32) -> AHashSet<Cell> {
    cells_within_range(bounds, center, radius)
}

/// Membership test matching `cells_within_range`
pub fn is_in_range(bounds: &GridBounds, target: Cell, origin: Cell, radius: u32) -> bool {
    bounds.contains(origin) && bounds.contains(target) && origin.distance(&target) <= radius
}

/// Stable row-major ordering for presenting a cell set
pub fn sorted_cells(cells: &AHashSet<Cell>) -> Vec<Cell> {
    let mut sorted: Vec<Cell> = cells.iter().copied().collect();
    sorted.sort_by_key(|c| (c.row, c.col));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_zero_is_origin() {
        let bounds = GridBounds::new(10, 8);
        let cells = cells_within_range(&bounds, Cell::new(4, 4), 0);
        assert_eq!(cells.len(), 1);
        assert!(cells.contains(&Cell::new(4, 4)));
    }

    #[test]
    fn test_radius_one_interior() {
        let bounds = GridBounds::new(10, 8);
        assert_eq!(cells_within_range(&bounds, Cell::new(4, 4), 1).len(), 7);
        assert_eq!(cells_within_range(&bounds, Cell::new(4, 4), 2).len(), 19);
    }

    #[test]
    fn test_clipped_at_edges() {
        let bounds = GridBounds::new(10, 8);
        let cells = cells_within_range(&bounds, Cell::new(0, 0), 1);
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|c| bounds.contains(*c)));
    }

    #[test]
    fn test_matches_distance_exactly() {
        let bounds = GridBounds::new(9, 7);
        for origin in [Cell::new(0, 0), Cell::new(4, 3), Cell::new(8, 6), Cell::new(3, 1)] {
            for radius in 0..6 {
                let bfs = cells_within_range(&bounds, origin, radius);
                let brute: AHashSet<Cell> = bounds
                    .cells()
                    .filter(|c| origin.distance(c) <= radius)
                    .collect();
                assert_eq!(bfs, brute, "origin {} radius {}", origin, radius);
            }
        }
    }

    #[test]
    fn test_off_grid_origin_is_empty() {
        let bounds = GridBounds::new(5, 5);
        assert!(cells_within_range(&bounds, Cell::new(-1, 2), 3).is_empty());
    }

    #[test]
    fn test_is_in_range_scenario() {
        let bounds = GridBounds::new(10, 8);
        let player = Cell::new(2, 2);
        assert!(is_in_range(&bounds, Cell::new(5, 2), player, 3));
        assert!(!is_in_range(&bounds, Cell::new(6, 2), player, 3));
    }

    #[test]
    fn test_aoe_radius_zero() {
        let bounds = GridBounds::new(10, 8);
        let aoe = cells_in_aoe(&bounds, Cell::new(5, 2), 0);
        assert_eq!(sorted_cells(&aoe), vec![Cell::new(5, 2)]);
    }

    #[test]
    fn test_sorted_cells_row_major() {
        let bounds = GridBounds::new(10, 8);
        let sorted = sorted_cells(&cells_in_aoe(&bounds, Cell::new(4, 4), 1));
        assert_eq!(sorted.first(), Some(&Cell::new(3, 3)));
        assert_eq!(sorted.last(), Some(&Cell::new(4, 5)));
    }
}
