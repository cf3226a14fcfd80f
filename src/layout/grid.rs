//! The shared output grid.

use crate::{BoundingBox, Cell, Pattern};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Dead,
    Alive,
}

/// Sparse composite grid built by the layout engine.
///
/// Explicitly written cells live in a map; column regions are recorded as
/// dead background rectangles instead of being filled cell by cell. Only the
/// layout engine writes to it.
#[derive(Debug, Clone, Default)]
pub struct OutputGrid {
    cells: HashMap<Cell, CellState>,
    background: Vec<BoundingBox>,
    overlaps: usize,
}

impl OutputGrid {
    pub fn new() -> Self {
        OutputGrid::default()
    }

    /// State of `cell`, or `None` outside every written cell and region.
    pub fn state(&self, cell: Cell) -> Option<CellState> {
        match self.cells.get(&cell) {
            Some(state) => Some(*state),
            None if self.background.iter().any(|region| region.contains(cell)) => Some(CellState::Dead),
            None => None,
        }
    }

    pub fn is_alive(&self, cell: Cell) -> bool {
        self.cells.get(&cell) == Some(&CellState::Alive)
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.values().filter(|s| **s == CellState::Alive).count()
    }

    /// Dead background rectangles, one per column region, in creation order.
    pub fn regions(&self) -> &[BoundingBox] {
        &self.background
    }

    /// Live cells stamped on top of an already live cell. Zero for any
    /// layout that honours its spacing rules.
    pub fn overlaps(&self) -> usize {
        self.overlaps
    }

    pub fn live_pattern(&self) -> Pattern {
        self.cells.iter().filter(|(_, s)| **s == CellState::Alive).map(|(c, _)| *c).collect()
    }

    /// Box around the live cells.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of_cells(self.cells.iter().filter(|(_, s)| **s == CellState::Alive).map(|(c, _)| c))
    }

    pub(crate) fn fill_dead(&mut self, region: BoundingBox) {
        self.background.push(region);
    }

    /// Write every cell of `pattern`, shifted by `(dx, dy)`, as alive.
    pub(crate) fn stamp(&mut self, pattern: &Pattern, dx: i64, dy: i64) -> usize {
        let mut collisions = 0;
        for cell in pattern.cells() {
            if self.cells.insert(cell.offset(dx, dy), CellState::Alive) == Some(CellState::Alive) {
                collisions += 1;
            }
        }
        self.overlaps += collisions;
        collisions
    }
}
