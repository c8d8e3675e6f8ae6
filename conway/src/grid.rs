// grid.rs - Cell storage for Conway's Game of Life
//
// The active `cols x rows` area is wrapped in a one-cell border that is
// always dead, so neighbour lookups never leave the backing storage.

use std::fmt;
use thiserror::Error;

/// Width of the dead frame around the active area.
const BORDER: usize = 1;

/// Largest board accepted, counted in active cells.
pub const MAX_CELLS: usize = 1 << 24;

/// Coordinate of a single cell; also the rendering key of a live cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
    #[error("grid dimensions must be non-zero, got {cols}x{rows}")]
    EmptyDimensions { cols: usize, rows: usize },
    #[error("grid of {cols}x{rows} exceeds the {} cell limit", MAX_CELLS)]
    TooLarge { cols: usize, rows: usize },
}

/// Rejects boards that are empty or larger than [`MAX_CELLS`].
pub fn check_dimensions(cols: usize, rows: usize) -> Result<(), GridError> {
    if cols == 0 || rows == 0 {
        return Err(GridError::EmptyDimensions { cols, rows });
    }
    match cols.checked_mul(rows) {
        Some(cells) if cells <= MAX_CELLS => Ok(()),
        _ => Err(GridError::TooLarge { cols, rows }),
    }
}

/// Fixed-size board of live/dead cells.
///
/// Two grids are equal when they have the same dimensions and every cell
/// matches; the border never holds a live cell so the derived equality is
/// pointwise over the active area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid.
    pub fn new(cols: usize, rows: usize) -> Result<Self, GridError> {
        check_dimensions(cols, rows)?;
        Ok(Self::dead(cols, rows))
    }

    /// Only called with dimensions that passed `check_dimensions`, so the
    /// bordered size cannot overflow.
    fn dead(cols: usize, rows: usize) -> Self {
        let len = (cols + 2 * BORDER) * (rows + 2 * BORDER);
        Self {
            cols,
            rows,
            cells: vec![false; len],
        }
    }

    /// Fresh all-dead grid with the same dimensions as `self`.
    pub fn empty_like(&self) -> Self {
        Self::dead(self.cols, self.rows)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Validates a signed coordinate against `[0, cols) x [0, rows)`.
    pub fn contains(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.cols && y < self.rows).then_some((x, y))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        self.in_bounds(x, y).then(|| self.cells[self.offset(x, y)])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        self.check(x, y)?;
        let offset = self.offset(x, y);
        self.cells[offset] = alive;
        Ok(())
    }

    /// Flips one cell and returns its new value.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        self.check(x, y)?;
        let offset = self.offset(x, y);
        self.cells[offset] = !self.cells[offset];
        Ok(self.cells[offset])
    }

    /// Live cells in row-major order (y ascending, then x ascending).
    pub fn live_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |y| {
            (0..self.cols)
                .filter(move |&x| self.cells[self.offset(x, y)])
                .map(move |x| Cell::new(x, y))
        })
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Reads a cell in bordered coordinates, where the active area spans
    /// `1..=cols` by `1..=rows` and index 0 / `cols + 1` is the dead frame.
    pub(crate) fn bordered(&self, bx: usize, by: usize) -> bool {
        self.cells[by * self.stride() + bx]
    }

    /// Unchecked read for callers iterating `0..cols` by `0..rows`.
    pub(crate) fn alive(&self, x: usize, y: usize) -> bool {
        self.cells[self.offset(x, y)]
    }

    pub(crate) fn put(&mut self, x: usize, y: usize, alive: bool) {
        let offset = self.offset(x, y);
        self.cells[offset] = alive;
    }

    fn stride(&self) -> usize {
        self.cols + 2 * BORDER
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y + BORDER) * self.stride() + x + BORDER
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    fn check(&self, x: usize, y: usize) -> Result<(), GridError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }
}
