// rules.rs - Standard B3/S23 transition rule

use crate::grid::Grid;

/// Bordered-coordinate offsets of the eight neighbours, relative to the
/// top-left corner of the 3x3 window around a cell.
#[rustfmt::skip]
const NEIGHBOURS: [(usize, usize); 8] = [
    (0, 0), (1, 0), (2, 0),
    (0, 1),         (2, 1),
    (0, 2), (1, 2), (2, 2),
];

/// Counts live neighbours of `(x, y)`. Positions beyond the edge of the
/// board read as dead; there is no wraparound.
pub fn live_neighbors(grid: &Grid, x: usize, y: usize) -> u8 {
    // (x, y) in active coordinates is (x + 1, y + 1) in bordered ones, so
    // the window's top-left corner is (x, y).
    NEIGHBOURS
        .iter()
        .filter(|&&(dx, dy)| grid.bordered(x + dx, y + dy))
        .count() as u8
}

pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    match (alive, live_neighbors) {
        (true, 2) | (true, 3) => true, // Survival
        (false, 3) => true,            // Birth
        _ => false,                    // Death or stays dead
    }
}

/// Computes the next generation. The input is never modified; every cell
/// of the result is derived from the previous generation only.
pub fn step(grid: &Grid) -> Grid {
    let mut next = grid.empty_like();
    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            let count = live_neighbors(grid, x, y);
            next.put(x, y, next_state(grid.alive(x, y), count));
        }
    }
    next
}
