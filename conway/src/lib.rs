//! Conway's Game of Life engine.
//!
//! [`Grid`] stores a fixed-size board, [`rules::step`] derives the next
//! generation, [`BoardController`] owns the board and its edits, and
//! [`Simulation`] runs generations on a timer that can be started, stopped
//! and re-paced while running. Presentation layers only need
//! [`Simulation::toggle`] and friends plus [`Simulation::live_cells`].

pub mod board;
pub mod config;
pub mod grid;
pub mod history;
pub mod patterns;
pub mod rules;
pub mod simulation;

pub use board::BoardController;
pub use config::{ConfigError, SimulationConfig};
pub use grid::{Cell, Grid, GridError};
pub use patterns::{PATTERNS, Pattern};
pub use simulation::{Simulation, SimulationError, SimulationState, Snapshot};
