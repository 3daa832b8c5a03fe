//! Dirty cell tracking for incremental redraws

use bitvec::prelude::*;

use crate::spatial::Cell;

/// Cells changed since the last render
///
/// Membership is a bit per grid cell so marking is O(1); insertion order is
/// kept separately so redraws replay edits in the order they happened.
#[derive(Clone, Debug, Default)]
pub struct DirtySet {
    marks: BitVec,
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl DirtySet {
    /// Create an empty set sized for a grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            marks: bitvec![0; width * height],
            cells: Vec::new(),
            width,
            height,
        }
    }

    /// Resize for a new grid, dropping all marks
    pub fn reset(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    fn bit(&self, cell: Cell) -> Option<usize> {
        let row = usize::try_from(cell.y).ok()?;
        let col = usize::try_from(cell.x).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }

    /// Mark a cell, returning whether it was newly added
    ///
    /// Cells outside the grid are ignored.
    pub fn mark(&mut self, cell: Cell) -> bool {
        let Some(bit) = self.bit(cell) else {
            return false;
        };
        if self.marks.get(bit).as_deref() == Some(&true) {
            return false;
        }
        self.marks.set(bit, true);
        self.cells.push(cell);
        true
    }

    /// Test cell membership
    pub fn contains(&self, cell: Cell) -> bool {
        self.bit(cell)
            .is_some_and(|bit| self.marks.get(bit).as_deref() == Some(&true))
    }

    /// Number of dirty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Test if nothing changed since the last render
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Dirty cells in the order they were marked
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Forget all marks, keeping the grid size
    pub fn clear(&mut self) {
        for cell in std::mem::take(&mut self.cells) {
            if let Some(bit) = self.bit(cell) {
                self.marks.set(bit, false);
            }
        }
    }
}
