//! A* pathfinding for battle maps
//!
//! Every step costs the same (base cost times the terrain multiplier), so
//! the search counts steps and converts to movement points at the end. The
//! opponent's cell is never entered. When the goal cannot be reached the
//! search heads for the reachable cell closest to it instead.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::battle::hex::{Cell, GridBounds};
use crate::battle::path::Path;

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    cell: Cell,
    f_steps: u32, // g + heuristic
    g_steps: u32,
    seq: u64, // discovery order
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap: lowest f, then lowest g, then first discovered
        other
            .f_steps
            .cmp(&self.f_steps)
            .then_with(|| other.g_steps.cmp(&self.g_steps))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `start` toward `goal`, cut to what `budget` pays for
///
/// Never fails: an unreachable goal yields the path to the closest
/// reachable cell, and an off-grid start yields the zero-step path.
pub fn compute_budget_limited_path(
    bounds: &GridBounds,
    start: Cell,
    goal: Cell,
    budget: u32,
    step_cost: f64,
    blocked: Option<Cell>,
) -> Path {
    let mut path = find_path(bounds, start, goal, blocked);
    path.truncate_to_budget(budget, step_cost);
    path
}

/// Unbounded A*; falls back to the closest reachable cell
pub fn find_path(bounds: &GridBounds, start: Cell, goal: Cell, blocked: Option<Cell>) -> Path {
    if start == goal || !bounds.contains(start) {
        return Path::new(start);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Cell, Cell> = AHashMap::new();
    let mut g_scores: AHashMap<Cell, u32> = AHashMap::new();
    let mut seq = 0u64;

    // Closest cell popped so far: (distance to goal, steps, seq)
    let mut closest = (start.distance(&goal), 0u32, 0u64, start);

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        cell: start,
        f_steps: start.distance(&goal),
        g_steps: 0,
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.cell == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        let best_g = g_scores.get(&current.cell).copied().unwrap_or(u32::MAX);
        if current.g_steps > best_g {
            continue; // stale entry
        }

        let h = current.cell.distance(&goal);
        if (h, current.g_steps, current.seq) < (closest.0, closest.1, closest.2) {
            closest = (h, current.g_steps, current.seq, current.cell);
        }

        for neighbor in bounds.neighbors(current.cell) {
            if Some(neighbor) == blocked {
                continue;
            }

            let tentative_g = current.g_steps + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.cell);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    cell: neighbor,
                    f_steps: tentative_g + neighbor.distance(&goal),
                    g_steps: tentative_g,
                    seq,
                });
            }
        }
    }

    reconstruct_path(&came_from, start, closest.3)
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<Cell, Cell>, start: Cell, end: Cell) -> Path {
    let mut cells = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                cells.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    cells.reverse();

    let mut path = Path::new(start);
    for cell in cells.into_iter().skip(1) {
        path.push_unchecked(cell);
    }
    path
}

/// Most hexes a budget pays for at `step_cost`, if movement is not free
pub fn max_steps(budget: u32, step_cost: f64) -> Option<usize> {
    if step_cost <= 0.0 {
        return None;
    }
    let mut steps = (budget as f64 / step_cost).floor() as usize;
    while crate::battle::path::path_cost(steps + 1, step_cost) <= budget {
        steps += 1;
    }
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridBounds {
        GridBounds::new(10, 8)
    }

    #[test]
    fn test_pathfind_straight_line() {
        let start = Cell::new(0, 0);
        let goal = Cell::new(5, 0);

        let path = find_path(&grid(), start, goal, None);

        assert_eq!(path.start(), start);
        assert_eq!(path.destination(), goal);
        assert_eq!(path.steps(), 5);
    }

    #[test]
    fn test_path_is_shortest() {
        let bounds = grid();
        for goal in bounds.cells() {
            let path = find_path(&bounds, Cell::new(4, 3), goal, None);
            assert_eq!(path.destination(), goal);
            assert_eq!(path.steps() as u32, Cell::new(4, 3).distance(&goal));
        }
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let start = Cell::new(5, 5);
        let path = find_path(&grid(), start, start, None);
        assert_eq!(path.steps(), 0);
        assert_eq!(path.start(), start);
    }

    #[test]
    fn test_budget_limits_steps() {
        // 30 movement at 5 per step is six hexes
        let path = compute_budget_limited_path(&grid(), Cell::new(0, 0), Cell::new(9, 0), 30, 5.0, None);
        assert_eq!(path.steps(), 6);
        assert_eq!(path.cost(5.0), 30);
        assert_eq!(path.destination(), Cell::new(6, 0));
    }

    #[test]
    fn test_desert_budget() {
        // 6 per step: 25 buys four steps
        let path = compute_budget_limited_path(&grid(), Cell::new(0, 0), Cell::new(9, 0), 25, 6.0, None);
        assert_eq!(path.steps(), 4);
    }

    #[test]
    fn test_blocked_goal_stops_adjacent() {
        let player = Cell::new(2, 4);
        let enemy = Cell::new(8, 4);
        let path = find_path(&grid(), enemy, player, Some(player));
        assert!(!path.contains(player));
        assert!(path.destination().is_adjacent(&player));
        assert_eq!(path.steps(), 5);
    }

    #[test]
    fn test_routes_around_blocked_cell() {
        let blocker = Cell::new(3, 0);
        let path = find_path(&grid(), Cell::new(2, 0), Cell::new(4, 0), Some(blocker));
        assert!(!path.contains(blocker));
        assert_eq!(path.destination(), Cell::new(4, 0));
        assert_eq!(path.steps(), 3);
    }

    #[test]
    fn test_off_grid_goal_heads_for_edge() {
        let path = find_path(&grid(), Cell::new(5, 3), Cell::new(20, 3), None);
        assert_eq!(path.destination(), Cell::new(9, 3));
    }

    #[test]
    fn test_zero_step_cost_is_unlimited() {
        let path = compute_budget_limited_path(&grid(), Cell::new(0, 0), Cell::new(9, 7), 0, 0.0, None);
        assert_eq!(path.destination(), Cell::new(9, 7));
    }

    #[test]
    fn test_max_steps() {
        assert_eq!(max_steps(30, 5.0), Some(6));
        assert_eq!(max_steps(25, 6.0), Some(4));
        assert_eq!(max_steps(10, 0.0), None);
    }
}
