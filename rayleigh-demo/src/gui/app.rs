use super::canvas::EguiCanvas;
use super::profiling::draw_profiling_widget;
use egui::{Key, Rect};
use rayleigh_core::render::{Palette, paint_frame};
use rayleigh_core::{Bounds, FrameTimingEvent, Simulation, SimulationDesc, SimulationEvent};
use std::collections::VecDeque;
use std::time::Duration;

/// Steps run per repaint at most; a slow machine drops time instead of spiralling
const MAX_STEPS_PER_UPDATE: u32 = 4;
const TIMING_HISTORY_LEN: usize = 240;
const COUNTER_FONT_SIZE: f32 = 20.0;
/// A playfield resize this early (e.g. the fullscreen transition) re-lays out the scene
const RELAYOUT_GRACE_FRAMES: u64 = 30;

pub struct ScatteringDemo {
    desc: SimulationDesc,
    simulation: Option<Simulation>,
    palette: Palette,
    last_error: Option<String>,
    /// Central panel rect of the latest frame
    playfield: Option<Rect>,
    /// Playfield size already reported as not matching the scene
    stale_bounds: Option<Bounds>,

    // UI state
    paused: bool,
    show_controls: bool,
    accumulator: f64,
    timing_history: VecDeque<FrameTimingEvent>,
}

impl ScatteringDemo {
    pub fn new(desc: SimulationDesc) -> Self {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .try_init();

        Self {
            palette: Palette::from_desc(&desc),
            desc,
            simulation: None,
            last_error: None,
            playfield: None,
            stale_bounds: None,
            paused: false,
            show_controls: false,
            accumulator: 0.0,
            timing_history: VecDeque::with_capacity(TIMING_HISTORY_LEN),
        }
    }

    fn bounds_of(rect: Rect) -> Bounds {
        Bounds::new(rect.width().floor() as f64, rect.height().floor() as f64)
    }

    /// Creates the simulation the first time the playfield size is known.
    fn ensure_simulation(&mut self, rect: Rect) {
        if self.simulation.is_some() || self.last_error.is_some() {
            return;
        }

        match Simulation::new(self.desc.clone(), Self::bounds_of(rect)) {
            Ok(simulation) => {
                log::info!(
                    "GUI: Simulation created for a {:.0}x{:.0} playfield",
                    rect.width(),
                    rect.height()
                );
                self.simulation = Some(simulation);
            }
            Err(e) => {
                log::error!("GUI: Failed to create simulation: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn reset(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.reset();
        }
        self.timing_history.clear();
        self.accumulator = 0.0;
    }

    /// Records the central panel rect and keeps the scene in step with it.
    fn on_playfield(&mut self, rect: Rect) {
        self.playfield = Some(rect);
        self.ensure_simulation(rect);

        let bounds = Self::bounds_of(rect);
        let Some(simulation) = &self.simulation else {
            return;
        };
        if simulation.scene().bounds() == bounds
            || self.stale_bounds == Some(bounds)
            || self.last_error.is_some()
        {
            return;
        }

        if simulation.frame() < RELAYOUT_GRACE_FRAMES {
            log::info!(
                "GUI: Playfield resized to {:.0}x{:.0}, laying the scene out again",
                bounds.width,
                bounds.height
            );
            self.regenerate();
        } else {
            let scene = simulation.scene().bounds();
            log::warn!(
                "GUI: Playfield is {:.0}x{:.0} but the scene was laid out for {:.0}x{:.0}; press N for a new layout",
                bounds.width,
                bounds.height,
                scene.width,
                scene.height
            );
            self.stale_bounds = Some(bounds);
        }
    }

    /// Lays out a new scene for the current playfield.
    fn regenerate(&mut self) {
        let Some(rect) = self.playfield else {
            return;
        };
        let bounds = Self::bounds_of(rect);
        self.last_error = None;
        self.stale_bounds = None;
        match self.simulation.as_mut() {
            Some(simulation) => {
                if let Err(e) = simulation.regenerate(bounds) {
                    log::error!("GUI: Failed to place a new layout: {}", e);
                    self.last_error = Some(e.to_string());
                }
            }
            None => self.ensure_simulation(rect),
        }
        self.timing_history.clear();
        self.accumulator = 0.0;
    }

    fn step_once(&mut self) {
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };

        let report = simulation.step();
        if self.timing_history.len() == TIMING_HISTORY_LEN {
            self.timing_history.pop_front();
        }
        self.timing_history.push_back(report.timing);

        for event in simulation.poll_events() {
            match event {
                SimulationEvent::SphereStruck {
                    segment,
                    class,
                    sector,
                } => {
                    log::debug!(
                        "GUI: Segment #{} ({:?}) absorbed in sector {}",
                        segment,
                        class,
                        sector
                    );
                }
                SimulationEvent::Retired { count } => {
                    log::debug!("GUI: Retired {} segment(s)", count);
                }
                _ => match event.segment() {
                    Some(id) => log::trace!("GUI: Segment #{}: {:?}", id, event),
                    None => log::trace!("GUI: Received event: {:?}", event),
                },
            }
        }

        if report.terminated > 0 && simulation.is_settled() {
            log::info!("GUI: All segments settled at frame {}", report.frame);
        }
    }

    /// Runs as many fixed steps as the elapsed time calls for.
    fn advance(&mut self, dt: f64) {
        let interval = self.desc.frame_interval();
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= interval && steps < MAX_STEPS_PER_UPDATE {
            self.step_once();
            self.accumulator -= interval;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_UPDATE {
            self.accumulator = self.accumulator.min(interval);
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (quit, pause, reset, regenerate, toggle) = ctx.input(|i| {
            (
                i.key_pressed(Key::Escape) || i.key_pressed(Key::Q),
                i.key_pressed(Key::Space),
                i.key_pressed(Key::R),
                i.key_pressed(Key::N),
                i.key_pressed(Key::Tab),
            )
        });

        if quit {
            log::info!("GUI: Quit requested");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if pause {
            self.paused = !self.paused;
        }
        if reset {
            self.reset();
        }
        if regenerate {
            self.regenerate();
        }
        if toggle {
            self.show_controls = !self.show_controls;
        }
    }

    fn draw_controls(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("control_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Control Panel");
                ui.separator();

                if let Some(simulation) = &self.simulation {
                    ui.label(format!("Frame: {}", simulation.frame()));
                    ui.label(format!("Segments: {}", simulation.segments().len()));
                    ui.label(format!("Growing: {}", simulation.growing_count()));
                    ui.label(format!("Absorbed: {}", simulation.tally().total()));
                    if simulation.is_settled() {
                        ui.label("Settled");
                    }
                }

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    let label = if self.paused { "Resume" } else { "Pause" };
                    if ui.button(label).clicked() {
                        self.paused = !self.paused;
                    }
                    if ui.add_enabled(self.paused, egui::Button::new("Step")).clicked() {
                        self.step_once();
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        self.reset();
                    }
                    if ui.button("New layout").clicked() {
                        self.regenerate();
                    }
                });

                ui.add_space(10.0);
                ui.label("Space: pause  R: reset  N: new layout");
                ui.label("Tab: controls  Esc/Q: quit");

                ui.add_space(20.0);
                ui.separator();

                let budget_us = (self.desc.frame_interval() * 1_000_000.0) as u64;
                draw_profiling_widget(ui, &self.timing_history, budget_us);
            });
    }
}

impl eframe::App for ScatteringDemo {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        if self.show_controls {
            self.draw_controls(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.on_playfield(rect);

                if !self.paused {
                    let dt = ctx.input(|i| i.stable_dt) as f64;
                    self.advance(dt);
                }

                match &self.simulation {
                    Some(simulation) => {
                        let painter = ui.painter_at(rect);
                        let mut canvas = EguiCanvas::new(&painter, rect.min, COUNTER_FONT_SIZE);
                        paint_frame(&mut canvas, simulation, &self.palette);
                    }
                    None => {
                        let message = self
                            .last_error
                            .as_deref()
                            .unwrap_or("Preparing playfield...");
                        ui.centered_and_justified(|ui| {
                            ui.colored_label(egui::Color32::RED, message);
                        });
                    }
                }
            });

        ctx.request_repaint_after(Duration::from_secs_f64(self.desc.frame_interval()));
    }
}
