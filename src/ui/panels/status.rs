// AnomalyDash - ui/panels/status.rs
//
// Static system status card. Shows "Active" unconditionally; no liveness
// probe is made against the inference service.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the status card contents.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.label(
        egui::RichText::new("Active")
            .size(32.0)
            .color(theme::accent(state.dark_mode)),
    );
    ui.add_space(12.0);
    ui.label("System is currently detecting anomalies");
}
