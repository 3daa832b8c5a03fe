//! Tile grid storage with signed cell addressing
//!
//! Cells are addressed with signed coordinates because pointer-driven input
//! routinely lands outside the grid. Every accessor treats such cells as a
//! silent no-op instead of an error.

use std::collections::{HashMap, HashSet};

use ndarray::Array2;

use crate::catalog::TileId;
use crate::io::error::{Result, invalid_parameter};

/// Grid coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Cell {
    /// Column index
    pub x: i32,
    /// Row index
    pub y: i32,
}

impl Cell {
    /// Create a cell from column and row
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell shifted by the given deltas
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Row-major 2D array of tile references
///
/// Every cell holds a tile from construction onwards, so there is no partially
/// initialized state to guard against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<TileId>,
}

impl Grid {
    /// Create a grid with every cell set to the same tile
    pub fn filled(width: usize, height: usize, tile: TileId) -> Self {
        Self {
            cells: Array2::from_elem((height, width), tile),
        }
    }

    /// Wrap an array indexed `[row, col]`
    pub const fn from_array(cells: Array2<TileId>) -> Self {
        Self { cells }
    }

    /// Build a grid from rows of equal length
    ///
    /// # Errors
    ///
    /// Returns an error if the rows have different lengths
    pub fn from_rows(rows: Vec<Vec<TileId>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().position(|row| row.len() != width) {
            return Err(invalid_parameter(
                "rows",
                &ragged,
                &format!("row length differs from first row length {width}"),
            ));
        }

        let flat: Vec<TileId> = rows.into_iter().flatten().collect();
        let cells = Array2::from_shape_vec((height, width), flat)
            .map_err(|e| invalid_parameter("rows", &height, &e))?;
        Ok(Self { cells })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Test whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Test whether a cell lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    fn index(&self, cell: Cell) -> Option<[usize; 2]> {
        let row = usize::try_from(cell.y).ok()?;
        let col = usize::try_from(cell.x).ok()?;
        (row < self.height() && col < self.width()).then_some([row, col])
    }

    /// Tile at a cell, `None` outside the grid
    pub fn get(&self, cell: Cell) -> Option<TileId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Place a tile, returning whether the cell changed
    ///
    /// Out-of-bounds cells and writes of the tile already present are no-ops.
    pub fn set(&mut self, cell: Cell, tile: TileId) -> bool {
        let Some(slot) = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
        else {
            return false;
        };
        if *slot == tile {
            return false;
        }
        *slot = tile;
        true
    }

    /// Underlying array indexed `[row, col]`
    pub const fn as_array(&self) -> &Array2<TileId> {
        &self.cells
    }

    /// Iterate all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, TileId)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &tile)| (Cell::new(col as i32, row as i32), tile))
    }

    /// Tile usage counts, most used first
    ///
    /// Ties are ordered by tile id so the result is deterministic.
    pub fn tile_counts(&self) -> Vec<(TileId, usize)> {
        let mut counts: HashMap<TileId, usize> = HashMap::new();
        for &tile in &self.cells {
            *counts.entry(tile).or_insert(0) += 1;
        }
        let mut counts: Vec<(TileId, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }

    /// Distinct tiles in first-seen row-major order
    pub fn unique_tiles(&self) -> Vec<TileId> {
        let mut seen = HashSet::new();
        self.cells
            .iter()
            .copied()
            .filter(|tile| seen.insert(*tile))
            .collect()
    }
}
