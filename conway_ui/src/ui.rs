// ui.rs - egui front-end over conway::Simulation
// Translates clicks into cell coordinates and draws the live-cell list; no game logic here

use conway::config::CELL_SIZE_PX;
use conway::{PATTERNS, Simulation};
use eframe::egui;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use tracing::warn;

const SPACING: f32 = 1.0;

pub struct GameOfLifeApp {
    simulation: Simulation,
    live_color: Color32,
    dead_color: Color32,
    selected_pattern: usize,
    // Declared last so the simulation is dropped before its runtime.
    _runtime: tokio::runtime::Runtime,
}

impl GameOfLifeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        simulation: Simulation,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        // Repaint whenever the engine publishes a new generation.
        let ctx = cc.egui_ctx.clone();
        let mut snapshots = simulation.subscribe();
        runtime.spawn(async move {
            while snapshots.changed().await.is_ok() {
                ctx.request_repaint();
            }
        });

        Self {
            simulation,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            selected_pattern: 0,
            _runtime: runtime,
        }
    }
}

/// Maps a position relative to the board's top-left corner to a cell.
/// Positions left of or above the board give negative coordinates, which
/// the engine ignores.
fn cell_at(local: Vec2, pitch: f32) -> (i64, i64) {
    (
        (local.x / pitch).floor() as i64,
        (local.y / pitch).floor() as i64,
    )
}

fn cell_rect(origin: Pos2, x: usize, y: usize, pitch: f32) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(x as f32 * pitch, y as f32 * pitch),
        Vec2::splat(pitch - SPACING),
    )
}

impl eframe::App for GameOfLifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let status = self.simulation.status();
        let (cols, rows) = self.simulation.dimensions();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            // Controls
            ui.horizontal(|ui| {
                let running = self.simulation.is_running();
                let button_text = if running { "⏸ Pause" } else { "▶ Start" };
                if ui.button(button_text).clicked() {
                    if running {
                        self.simulation.stop();
                    } else {
                        self.simulation.start();
                    }
                }

                if ui.button("⏭ Step").clicked() {
                    self.simulation.step_once();
                }

                if ui.button("⏹ Clear").clicked() {
                    self.simulation.stop();
                    self.simulation.clear();
                }

                if ui.button("🎲 Random").clicked() {
                    self.simulation.stop();
                    self.simulation.randomize();
                }

                ui.separator();

                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    self.simulation.stop();
                    self.simulation.load_pattern(&PATTERNS[self.selected_pattern]);
                }

                ui.separator();

                ui.label(format!("Generation: {}", status.generation));
            });

            ui.separator();

            // Speed control
            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = 1000.0 / status.interval.as_millis().max(1) as f32;
                if ui
                    .add(egui::Slider::new(&mut speed, 0.5..=90.0).suffix(" gen/sec"))
                    .changed()
                {
                    let ms = (1000.0 / speed).round() as u64;
                    if let Err(err) = self.simulation.set_interval(ms) {
                        warn!(%err, "speed change rejected");
                    }
                }

                ui.separator();

                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();
            ui.label("Click cells to toggle them. Start runs the board; Pause stops it.");
            ui.separator();

            // Board
            let pitch = CELL_SIZE_PX as f32;
            let board_size = Vec2::new(cols as f32 * pitch, rows as f32 * pitch);
            let (response, painter) = ui.allocate_painter(board_size, egui::Sense::click());
            let origin = response.rect.min;

            painter.rect_filled(response.rect, 0.0, Color32::BLACK);
            for y in 0..rows {
                for x in 0..cols {
                    painter.rect_filled(cell_rect(origin, x, y, pitch), 1.0, self.dead_color);
                }
            }
            for cell in self.simulation.live_cells() {
                let rect = cell_rect(origin, cell.x, cell.y, pitch);
                painter.rect_filled(rect, 1.0, self.live_color);
                painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = cell_at(pos - origin, pitch);
                    self.simulation.toggle(x, y);
                }
            }

            ui.separator();

            let total = cols * rows;
            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {}", status.population));
                ui.label(format!("Dead cells: {}", total - status.population));
                ui.label(format!(
                    "Population: {:.1}%",
                    status.population as f32 / total as f32 * 100.0
                ));
                if status.settled {
                    ui.label("(settled)");
                }
            });
        });
    }
}
