// simulation.rs - Start/stop state machine driving generation steps on tokio
//
// The board and the run state share one mutex with the scheduled task.
// A generation step holds it from start to finish, so a step never
// interleaves with a user command. Each `start` opens a new run epoch; a
// scheduled step re-checks state and epoch under the lock before touching
// the board, so a step cancelled by `stop` never runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::board::BoardController;
use crate::config::{ConfigError, SimulationConfig};
use crate::grid::{Cell, GridError};
use crate::patterns::Pattern;
use crate::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationState {
    #[default]
    Stopped,
    Running,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("interval must be a positive number of milliseconds, got {0}")]
    InvalidInterval(u64),
    #[error("no tokio runtime available to schedule generation steps")]
    NoRuntime,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// What an observer needs to know after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub generation: u64,
    pub population: usize,
    pub state: SimulationState,
    pub interval: Duration,
    /// The latest generation repeated a recently seen board.
    pub settled: bool,
}

struct Inner {
    board: BoardController,
    state: SimulationState,
    interval: Duration,
    epoch: u64,
    settled: bool,
    stop_when_settled: bool,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.board.generation(),
            population: self.board.population(),
            state: self.state,
            interval: self.interval,
            settled: self.settled,
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.state == SimulationState::Running && self.epoch == epoch
    }

    fn generation_step(&mut self) {
        let next = rules::step(self.board.grid());
        self.settled = self.board.apply_generation(next);
        trace!(
            generation = self.board.generation(),
            population = self.board.population(),
            settled = self.settled,
            "generation step"
        );
        if self.settled && self.stop_when_settled && self.state == SimulationState::Running {
            self.state = SimulationState::Stopped;
            info!(generation = self.board.generation(), "board settled, stopping");
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    snapshots: watch::Sender<Snapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every step runs to completion under the lock, so the board is
        // consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(inner.snapshot());
    }

    /// Runs `f` against the board and publishes the result.
    fn mutate<R>(&self, f: impl FnOnce(&mut BoardController) -> R) -> R {
        let mut inner = self.lock();
        let result = f(&mut inner.board);
        inner.settled = false;
        self.publish(&inner);
        result
    }
}

/// Owns the board and the free-running loop around it.
///
/// Every command returns immediately; scheduled generation steps run later
/// on the tokio runtime the simulation was created with. Dropping the
/// simulation stops it.
pub struct Simulation {
    shared: Arc<Shared>,
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl Simulation {
    /// Builds a simulation on the ambient tokio runtime.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let runtime = Handle::try_current().map_err(|_| SimulationError::NoRuntime)?;
        Self::with_handle(config, runtime)
    }

    /// Builds a simulation that schedules its steps on `runtime`, for
    /// callers (such as a GUI thread) that are not inside a runtime.
    pub fn with_handle(config: SimulationConfig, runtime: Handle) -> Result<Self, SimulationError> {
        config.validate()?;
        let board = BoardController::new(config.cols, config.rows, config.seed)?;
        let inner = Inner {
            board,
            state: SimulationState::Stopped,
            interval: config.interval(),
            epoch: 0,
            settled: false,
            stop_when_settled: config.stop_when_settled,
        };
        let (snapshots, _) = watch::channel(inner.snapshot());
        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                snapshots,
            }),
            runtime,
            task: None,
        })
    }

    pub fn state(&self) -> SimulationState {
        self.shared.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == SimulationState::Running
    }

    pub fn interval(&self) -> Duration {
        self.shared.lock().interval
    }

    /// `(cols, rows)` of the board.
    pub fn dimensions(&self) -> (usize, usize) {
        let inner = self.shared.lock();
        (inner.board.cols(), inner.board.rows())
    }

    pub fn status(&self) -> Snapshot {
        self.shared.lock().snapshot()
    }

    /// Receives a fresh [`Snapshot`] after every command and every step.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Live cells in row-major order; the only data a renderer needs.
    pub fn live_cells(&self) -> Vec<Cell> {
        self.shared.lock().board.live_cells()
    }

    pub fn toggle(&self, x: i64, y: i64) {
        self.shared.mutate(|board| board.toggle(x, y));
    }

    pub fn clear(&self) {
        self.shared.mutate(BoardController::clear);
    }

    pub fn randomize(&self) {
        self.shared.mutate(BoardController::randomize);
    }

    pub fn load_pattern(&self, pattern: &Pattern) {
        self.shared.mutate(|board| board.load_pattern(pattern));
    }

    /// Advances one generation by hand, whatever the run state.
    pub fn step_once(&self) -> Snapshot {
        let mut inner = self.shared.lock();
        inner.generation_step();
        self.shared.publish(&inner);
        inner.snapshot()
    }

    /// Changes the delay used for the next scheduled step onwards. A step
    /// that is already pending keeps the delay it was scheduled with.
    pub fn set_interval(&self, ms: u64) -> Result<(), SimulationError> {
        if ms == 0 {
            return Err(SimulationError::InvalidInterval(ms));
        }
        let mut inner = self.shared.lock();
        inner.interval = Duration::from_millis(ms);
        debug!(interval_ms = ms, "interval updated");
        self.shared.publish(&inner);
        Ok(())
    }

    /// Switches to `Running`, performs one generation immediately and
    /// schedules the next. Does nothing if already running.
    pub fn start(&mut self) {
        let (epoch, delay) = {
            let mut inner = self.shared.lock();
            if inner.state == SimulationState::Running {
                return;
            }
            inner.state = SimulationState::Running;
            inner.epoch += 1;
            info!(interval_ms = inner.interval.as_millis() as u64, "simulation started");

            inner.generation_step();
            self.shared.publish(&inner);
            if inner.state != SimulationState::Running {
                return;
            }
            (inner.epoch, inner.interval)
        };

        if let Some(stale) = self.task.take() {
            stale.abort();
        }
        let shared = Arc::clone(&self.shared);
        self.task = Some(self.runtime.spawn(run(shared, epoch, delay)));
    }

    /// Switches to `Stopped` and cancels the pending step. Does nothing if
    /// already stopped.
    pub fn stop(&mut self) {
        {
            let mut inner = self.shared.lock();
            if inner.state == SimulationState::Stopped {
                return;
            }
            inner.state = SimulationState::Stopped;
            info!(generation = inner.board.generation(), "simulation stopped");
            self.shared.publish(&inner);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Self-rescheduling loop for one run epoch. The delay is read when each
/// step is scheduled, right after the previous step finished.
async fn run(shared: Arc<Shared>, epoch: u64, mut delay: Duration) {
    loop {
        tokio::time::sleep(delay).await;

        let mut inner = shared.lock();
        if !inner.is_current(epoch) {
            trace!(epoch, "scheduled step cancelled");
            return;
        }
        inner.generation_step();
        shared.publish(&inner);
        if inner.state != SimulationState::Running {
            return;
        }
        delay = inner.interval;
    }
}
