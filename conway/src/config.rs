// config.rs - Board dimensions and loop timing, fixed at construction

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{self, GridError, MAX_CELLS};

/// Reference drawing area and cell size; 800x600 px of 20 px cells is a
/// 40 x 30 board.
pub const BOARD_WIDTH_PX: u32 = 800;
pub const BOARD_HEIGHT_PX: u32 = 600;
pub const CELL_SIZE_PX: u32 = 20;

pub const DEFAULT_INTERVAL_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board must have at least one column and one row, got {cols}x{rows}")]
    EmptyBoard { cols: usize, rows: usize },
    #[error("board of {cols}x{rows} exceeds the {} cell limit", MAX_CELLS)]
    TooLarge { cols: usize, rows: usize },
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("interval must be a positive number of milliseconds")]
    ZeroInterval,
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Board height in cells.
    pub rows: usize,
    /// Delay between generation steps while running.
    pub interval_ms: u64,
    /// Seed for `randomize`; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Stop the loop once a generation repeats a recent board.
    pub stop_when_settled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cols: (BOARD_WIDTH_PX / CELL_SIZE_PX) as usize,
            rows: (BOARD_HEIGHT_PX / CELL_SIZE_PX) as usize,
            interval_ms: DEFAULT_INTERVAL_MS,
            seed: None,
            stop_when_settled: false,
        }
    }
}

impl SimulationConfig {
    /// Derives the board size from a drawing area and a cell size in pixels.
    pub fn from_pixels(width: u32, height: u32, cell_size: u32) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        let config = Self {
            cols: (width / cell_size) as usize,
            rows: (height / cell_size) as usize,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (cols, rows) = (self.cols, self.rows);
        match grid::check_dimensions(cols, rows) {
            Err(GridError::TooLarge { .. }) => return Err(ConfigError::TooLarge { cols, rows }),
            Err(_) => return Err(ConfigError::EmptyBoard { cols, rows }),
            Ok(()) => {}
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
