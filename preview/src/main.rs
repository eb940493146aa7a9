//! Desktop preview app for floor-light-composer
//!
//! Runs the animation scheduler on a worker thread against a simulated PWM
//! expander and draws the floors in a window. Stopping (or closing the window)
//! raises the cancel signal; the window stays open until the scheduler has torn
//! the session down, so the simulated outputs always end dark and released.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use eframe::egui::{self};
use floor_light_composer::{
    AnimationConfig, BlockingClock, CancelGranularity, CancelSignal, ChannelSink, DutyPolarity,
    FloorScheduler, HardwareError, MAX_DUTY, PWM_EXPANDER_CHANNELS,
};

/// Height of each floor rectangle in pixels
const FLOOR_HEIGHT: f32 = 28.0;

/// Gap between floors
const FLOOR_GAP: f32 = 4.0;

/// Width of the building
const BUILDING_WIDTH: f32 = 220.0;

/// Cancel signal shared between the UI and the scheduler thread
static CANCEL: CancelSignal = CancelSignal::new();

/// What the simulated PWM expander currently outputs
#[derive(Debug, Clone, Copy)]
struct PanelState {
    duties: [u16; PWM_EXPANDER_CHANNELS],
    initialized: bool,
    released: bool,
}

impl PanelState {
    const fn new() -> Self {
        Self {
            duties: [0; PWM_EXPANDER_CHANNELS],
            initialized: false,
            released: false,
        }
    }
}

/// Channel sink writing into memory shared with the UI
#[derive(Clone)]
struct SharedSink {
    panel: Arc<Mutex<PanelState>>,
}

impl SharedSink {
    fn with_panel<R>(&self, f: impl FnOnce(&mut PanelState) -> R) -> R {
        let mut panel = self.panel.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut panel)
    }
}

impl ChannelSink for SharedSink {
    fn write(&mut self, channel: u8, duty: u16) -> Result<(), HardwareError> {
        self.with_panel(|panel| {
            if panel.released {
                return Err(HardwareError::Released);
            }
            panel.duties[usize::from(channel)] = duty;
            Ok(())
        })
    }

    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.with_panel(|panel| {
            panel.initialized = true;
            panel.released = false;
        });
        Ok(())
    }

    fn reset(&mut self) -> Result<(), HardwareError> {
        self.with_panel(|panel| panel.duties = [0; PWM_EXPANDER_CHANNELS]);
        Ok(())
    }

    fn release(&mut self) -> Result<(), HardwareError> {
        self.with_panel(|panel| {
            panel.initialized = false;
            panel.released = true;
        });
        Ok(())
    }
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 520.0])
            .with_title("Floor Light Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "floor-light-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    /// Simulated hardware
    sink: SharedSink,
    /// Scheduler thread, if a session is active
    worker: Option<JoinHandle<Result<(), String>>>,
    /// Outcome of the last finished session
    status: String,
    /// Close requested while a session was still running
    closing: bool,

    // Startup configuration, applied on the next start
    channel_count: u8,
    polarity: DutyPolarity,
    granularity: CancelGranularity,
}

impl PreviewApp {
    fn new() -> Self {
        Self {
            sink: SharedSink {
                panel: Arc::new(Mutex::new(PanelState::new())),
            },
            worker: None,
            status: String::from("idle"),
            closing: false,
            channel_count: AnimationConfig::DEFAULT.channel_count,
            polarity: DutyPolarity::default(),
            granularity: CancelGranularity::default(),
        }
    }

    fn config(&self) -> AnimationConfig {
        let mut config = AnimationConfig::with_channels(self.channel_count);
        config.polarity = self.polarity;
        config.granularity = self.granularity;
        config
    }

    /// Spawn a new session on a worker thread
    fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        CANCEL.reset();
        let config = self.config();
        let sink = self.sink.clone();
        sink.with_panel(|panel| *panel = PanelState::new());

        self.worker = Some(std::thread::spawn(move || {
            let mut scheduler =
                FloorScheduler::new(sink, BlockingClock::new(), CANCEL.token(), &config)
                    .map_err(|error| format!("invalid configuration: {error}"))?;
            scheduler.run().map_err(|error| format!("failed: {error}"))
        }));
        self.status = String::from("running");
    }

    /// Request cancellation; the session ends after the current pattern or frame
    fn stop(&mut self) {
        if self.worker.is_some() {
            CANCEL.handle().cancel();
            self.status = String::from("stopping");
        }
    }

    /// Collect the worker once it has finished
    fn collect(&mut self) {
        let finished = self
            .worker
            .as_ref()
            .is_some_and(JoinHandle::is_finished);
        if !finished {
            return;
        }
        if let Some(worker) = self.worker.take() {
            self.status = match worker.join() {
                Ok(Ok(())) => String::from("stopped"),
                Ok(Err(message)) => message,
                Err(_) => String::from("scheduler thread panicked"),
            };
        }
    }

    /// Brightness percentage shown by a floor, undoing the duty polarity
    fn floor_level(&self, duty: u16) -> f32 {
        let fraction = f32::from(duty) / f32::from(MAX_DUTY);
        match self.polarity {
            DutyPolarity::Direct => fraction,
            DutyPolarity::Inverted => 1.0 - fraction,
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|input| input.viewport().close_requested()) && self.worker.is_some() {
            // Keep the window until teardown is done
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.stop();
            self.closing = true;
        }
        self.collect();
        if self.closing && self.worker.is_none() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let panel = self.sink.with_panel(|panel| *panel);

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            let running = self.worker.is_some();

            ui.add_enabled_ui(!running, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Floors:");
                    ui.add(egui::Slider::new(
                        &mut self.channel_count,
                        1..=PWM_EXPANDER_CHANNELS as u8,
                    ));
                });

                ui.horizontal(|ui| {
                    ui.label("Polarity:");
                    ui.selectable_value(&mut self.polarity, DutyPolarity::Inverted, "inverted");
                    ui.selectable_value(&mut self.polarity, DutyPolarity::Direct, "direct");
                });

                ui.horizontal(|ui| {
                    ui.label("Cancel:");
                    ui.selectable_value(
                        &mut self.granularity,
                        CancelGranularity::BetweenPatterns,
                        "between patterns",
                    );
                    ui.selectable_value(
                        &mut self.granularity,
                        CancelGranularity::BetweenFrames,
                        "between frames",
                    );
                });
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if running {
                    if ui.button("⏹ Stop").clicked() {
                        self.stop();
                    }
                } else if ui.button("▶ Start").clicked() {
                    self.start();
                }
                ui.add_space(8.0);
                ui.label(format!("Status: {}", self.status));
                if panel.released {
                    ui.label("(sink released)");
                }
            });

            ui.add_space(16.0);

            // === Building ===
            let floors = usize::from(self.channel_count);
            let pitch = FLOOR_HEIGHT + FLOOR_GAP;
            #[allow(clippy::cast_precision_loss)]
            let height = floors as f32 * pitch;
            let (response, painter) = ui.allocate_painter(
                egui::vec2(BUILDING_WIDTH, height),
                egui::Sense::hover(),
            );
            let origin = response.rect.min;

            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss
            )]
            for floor in 0..floors {
                let level = if panel.initialized {
                    self.floor_level(panel.duties[floor])
                } else {
                    0.0
                };
                // Floor 0 is at the bottom
                let y = origin.y + (floors - 1 - floor) as f32 * pitch;
                let rect = egui::Rect::from_min_size(
                    egui::pos2(origin.x, y),
                    egui::vec2(BUILDING_WIDTH, FLOOR_HEIGHT),
                );
                let shade = |max: f32| (max * level).round() as u8;
                let color = egui::Color32::from_rgb(
                    shade(255.0).max(24),
                    shade(214.0).max(24),
                    shade(150.0).max(28),
                );
                painter.rect_filled(rect, 3.0, color);
            }
        });
    }
}
