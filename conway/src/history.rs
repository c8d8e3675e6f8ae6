// history.rs - Recent-generation fingerprints for spotting settled boards

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;

/// How many past generations are remembered.
pub const HISTORY_LEN: usize = 10;

/// Ring of grid fingerprints. A generation whose fingerprint is already in
/// the ring repeats a recent board: a still life or an oscillator with a
/// period shorter than `HISTORY_LEN`.
#[derive(Debug, Clone, Default)]
pub struct GenerationHistory {
    recent: [u64; HISTORY_LEN],
    count: usize,
}

pub fn fingerprint(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.hash(&mut hasher);
    hasher.finish()
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything and remembers `grid` as the only known board.
    pub fn reset(&mut self, grid: &Grid) {
        self.count = 0;
        self.record(grid);
    }

    /// Records `grid` and reports whether it repeats a remembered board.
    /// A repeated board is not recorded a second time.
    pub fn record(&mut self, grid: &Grid) -> bool {
        let current = fingerprint(grid);
        let filled = self.count.min(HISTORY_LEN);
        if self.recent[..filled].contains(&current) {
            return true;
        }
        self.recent[self.count % HISTORY_LEN] = current;
        self.count += 1;
        false
    }
}
