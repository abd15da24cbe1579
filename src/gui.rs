// AnomalyDash - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the panels and manages the detection lifecycle.

use crate::app::detect::{DetectionManager, DetectionProgress};
use crate::app::state::AppState;
use crate::ui;
use crate::util::constants;

/// The AnomalyDash application.
pub struct DashboardApp {
    pub state: AppState,
    pub detector: DetectionManager,
    /// Palette currently installed on the egui context.
    applied_dark_mode: Option<bool>,
}

impl DashboardApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState, detector: DetectionManager) -> Self {
        Self {
            state,
            detector,
            applied_dark_mode: None,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.applied_dark_mode != Some(self.state.dark_mode) {
            ui::theme::apply(ctx, self.state.dark_mode);
            self.applied_dark_mode = Some(self.state.dark_mode);
        }

        // Poll the detection worker.
        for msg in self.detector.poll_progress() {
            match msg {
                DetectionProgress::Completed { ticket, outcome } => {
                    self.state.apply_outcome(ticket, outcome, chrono::Local::now());
                }
            }
        }

        // request_submit: the uploader panel's button was clicked last frame.
        if let Some(request) = self.state.take_submit() {
            self.detector.start(request);
        }

        // Keep polling while a request is in flight so the result shows promptly.
        if self.state.uploader.is_pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(
                constants::DETECTION_POLL_INTERVAL_MS,
            ));
        }

        // Top bar
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("\u{1f4c8}")
                        .size(18.0)
                        .color(ui::theme::accent(self.state.dark_mode)),
                );
                ui.heading(constants::APP_TITLE);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button("\u{24d8}")
                        .on_hover_text("About")
                        .clicked()
                    {
                        self.state.show_about = true;
                    }
                    let (icon, hint) = if self.state.dark_mode {
                        ("\u{2600}", "Switch to light mode")
                    } else {
                        ("\u{1f319}", "Switch to dark mode")
                    };
                    if ui.button(icon).on_hover_text(hint).clicked() {
                        self.state.toggle_theme();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&self.state.endpoint).monospace().weak());
                    if !self.state.warnings.is_empty() {
                        ui.colored_label(
                            ui::theme::WARNING_COLOUR,
                            format!("\u{26a0} {} config warning(s)", self.state.warnings.len()),
                        )
                        .on_hover_text(self.state.warnings.join("\n"));
                    }
                });
            });
        });

        // Dashboard cards: uploader | chart, statistics | status.
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let dark = self.state.dark_mode;
                    let state = &mut self.state;
                    ui.columns(2, |cols| {
                        ui::card(&mut cols[0], "Image Upload", ui::theme::TOP_CARD_HEIGHT, dark, |ui| {
                            ui::panels::uploader::render(ui, state);
                        });
                        ui::card(
                            &mut cols[1],
                            "Anomaly Detection",
                            ui::theme::TOP_CARD_HEIGHT,
                            dark,
                            |ui| ui::panels::chart::render(ui, state),
                        );
                    });
                    ui.add_space(ui::theme::CARD_SPACING);
                    ui.columns(2, |cols| {
                        ui::card(
                            &mut cols[0],
                            "Statistics",
                            ui::theme::BOTTOM_CARD_HEIGHT,
                            dark,
                            |ui| ui::panels::statistics::render(ui, state),
                        );
                        ui::card(
                            &mut cols[1],
                            "System Status",
                            ui::theme::BOTTOM_CARD_HEIGHT,
                            dark,
                            |ui| ui::panels::status::render(ui, state),
                        );
                    });
                });
        });

        ui::panels::about::render(ctx, &mut self.state);
    }
}
