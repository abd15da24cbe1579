// AnomalyDash - ui/panels/statistics.rs
//
// Anomaly counter over the rolling history window.

use crate::app::state::AppState;
use crate::core::history::History;
use crate::ui::theme;

/// Headline figure, e.g. "3 Anomalies".
pub fn anomaly_headline(history: &History) -> String {
    format!("{} Anomalies", history.anomaly_count())
}

/// Caption under the headline.
pub fn window_caption(history: &History) -> String {
    format!("Number of anomalies in last {} detections", history.len())
}

/// Render the statistics card contents.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.label(
        egui::RichText::new(anomaly_headline(&state.history))
            .size(32.0)
            .color(theme::accent(state.dark_mode)),
    );
    ui.add_space(12.0);
    ui.label(window_caption(&state.history));
}
