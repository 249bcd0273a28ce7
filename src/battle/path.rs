//! Movement paths
//!
//! A `Path` always starts at the mover's cell and every consecutive pair of
//! cells is hex-adjacent. `PathDraft` builds one cell at a time for
//! drag-to-draw input, where stepping back onto an earlier cell undoes the
//! steps after it.

use serde::Serialize;

use crate::battle::error::CombatError;
use crate::battle::hex::{Cell, GridBounds};

/// Cost of walking `steps` hexes at `step_cost` each, floored to whole points
///
/// A step cost of zero makes movement free.
pub fn path_cost(steps: usize, step_cost: f64) -> u32 {
    let raw = steps as f64 * step_cost.max(0.0);
    (raw + 1e-6).floor().min(u32::MAX as f64) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// Zero-step path standing on `start`
    pub fn new(start: Cell) -> Self {
        Self { cells: vec![start] }
    }

    /// Validate a proposed sequence of cells
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, CombatError> {
        if cells.is_empty() {
            return Err(CombatError::NoPathSelected);
        }
        if let Some(pair) = cells.windows(2).find(|w| !w[0].is_adjacent(&w[1])) {
            return Err(CombatError::NotAdjacent(pair[1]));
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    pub fn destination(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Number of hex steps (cells minus one)
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn cost(&self, step_cost: f64) -> u32 {
        path_cost(self.steps(), step_cost)
    }

    /// Cut the path back to at most `steps` steps
    pub fn truncate_steps(&mut self, steps: usize) {
        self.cells.truncate(steps + 1);
    }

    /// Keep the longest prefix whose cost fits in `budget`
    pub fn truncate_to_budget(&mut self, budget: u32, step_cost: f64) {
        while self.steps() > 0 && self.cost(step_cost) > budget {
            self.cells.pop();
        }
    }

    pub(crate) fn push_unchecked(&mut self, cell: Cell) {
        debug_assert!(self.destination().is_adjacent(&cell));
        self.cells.push(cell);
    }
}

/// What a `PathDraft::extend` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftChange {
    Extended,
    Retraced,
    Unchanged,
}

/// A path being drawn cell by cell
#[derive(Debug, Clone)]
pub struct PathDraft {
    path: Path,
    bounds: GridBounds,
    blocked: Cell,
}

impl PathDraft {
    /// Start drawing from `start`; `blocked` is the opponent's cell
    pub fn new(start: Cell, bounds: GridBounds, blocked: Cell) -> Self {
        Self {
            path: Path::new(start),
            bounds,
            blocked,
        }
    }

    pub fn extend(&mut self, cell: Cell) -> Result<DraftChange, CombatError> {
        if !self.bounds.contains(cell) {
            return Err(CombatError::OutOfBounds(cell));
        }
        if cell == self.blocked {
            return Err(CombatError::OccupiedCell(cell));
        }
        if cell == self.path.destination() {
            return Ok(DraftChange::Unchanged);
        }
        if !self.path.destination().is_adjacent(&cell) {
            return Err(CombatError::NotAdjacent(cell));
        }
        // Stepping back onto an earlier cell drops everything after it
        if let Some(index) = self.path.cells.iter().position(|c| *c == cell) {
            self.path.truncate_steps(index);
            return Ok(DraftChange::Retraced);
        }
        self.path.push_unchecked(cell);
        Ok(DraftChange::Extended)
    }

    /// Drop the whole draft back to the start cell
    pub fn clear(&mut self) {
        self.path.truncate_steps(0);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> Path {
        self.path
    }
}
