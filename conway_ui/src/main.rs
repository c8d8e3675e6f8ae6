// main.rs - Desktop front-end for the conway engine
// Board logic lives in the `conway` crate; ui.rs only draws and forwards clicks

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use conway::config::CELL_SIZE_PX;
use conway::{Simulation, SimulationConfig};
use eframe::egui;
use tracing::info;

mod ui;

use ui::GameOfLifeApp;

#[derive(Debug, Parser)]
#[command(name = "conway_ui", about = "Interactive Conway's Game of Life")]
struct Args {
    /// TOML file with board size, interval and seed.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the Random button.
    #[arg(long)]
    seed: Option<u64>,
    /// Delay between generations while running.
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;
    info!(cols = config.cols, rows = config.rows, interval_ms = config.interval_ms, "starting");

    // Generation steps are scheduled here; egui keeps the main thread.
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let simulation = Simulation::with_handle(config.clone(), runtime.handle().clone())?;

    let board_w = (config.cols as u32 * CELL_SIZE_PX) as f32;
    let board_h = (config.rows as u32 * CELL_SIZE_PX) as f32;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([board_w.max(640.0) + 40.0, board_h + 220.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| Box::new(GameOfLifeApp::new(cc, simulation, runtime))),
    )
    .map_err(|err| anyhow!("window closed with an error: {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// File values first, then command-line overrides.
fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = interval_ms;
    }
    config.validate()?;
    Ok(config)
}
