// AnomalyDash - ui/panels/uploader.rs
//
// Image upload card: file picker, model selector, submit button, and the
// last result. Submitting only raises `state.request_submit`; the app loop
// starts the background detection.

use crate::app::state::AppState;
use crate::core::model::DetectionOutcome;
use crate::core::uploader::{UploaderPhase, UploaderState};
use crate::ui::theme::{self, ResultStyle};
use crate::util::constants;

/// Display-ready view of a detection outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub headline: &'static str,
    pub score: String,
    pub style: ResultStyle,
    /// Failure explanation, only for failed requests.
    pub detail: Option<String>,
}

impl ResultView {
    pub fn from_outcome(outcome: &DetectionOutcome) -> Self {
        let result = outcome.display_result();
        let detail = match outcome {
            DetectionOutcome::Detected(_) => None,
            DetectionOutcome::Failed { kind, message } => Some(format!("{kind}: {message}")),
        };
        Self {
            headline: result.result.headline(),
            score: result.score_label(),
            style: theme::result_style(result.result),
            detail,
        }
    }
}

/// Human-readable byte size for uploads (images stay well under 1 GB).
fn format_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.1} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Line under the picker describing the current selection.
pub fn selection_caption(uploader: &UploaderState) -> String {
    match (uploader.phase(), uploader.image()) {
        (UploaderPhase::Empty, _) | (_, None) => "No image selected".to_string(),
        (UploaderPhase::Ready, Some(image)) => format!(
            "Selected file: {} ({})",
            image.name,
            format_size(image.size_bytes)
        ),
        (UploaderPhase::Submitted, Some(image)) => format!("Analysed file: {}", image.name),
    }
}

/// Render the uploader card contents.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let pending = state.uploader.is_pending();

    // Picking mid-request is allowed; the in-flight result is then charted
    // but not shown against the new file.
    if ui.button("\u{2b06} Select Image").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", constants::IMAGE_EXTENSIONS)
            .pick_file()
        {
            state.pick_image(&path);
        }
    }

    ui.label(selection_caption(&state.uploader));
    ui.add_space(8.0);

    let mut model = state.uploader.model();
    egui::ComboBox::from_label("Select Model")
        .selected_text(model.display_name())
        .show_ui(ui, |ui| {
            for m in &state.offered_models {
                ui.selectable_value(&mut model, *m, m.display_name());
            }
        });
    if model != state.uploader.model() {
        state.uploader.select_model(model);
    }
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let button = egui::Button::new("Detect Anomaly");
        if ui.add_enabled(state.uploader.can_submit(), button).clicked() {
            state.request_submit = true;
        }
        if pending {
            ui.spinner();
            ui.label("Detecting\u{2026}");
        }
    });

    if let Some(outcome) = state.uploader.last_outcome() {
        ui.add_space(12.0);
        render_result(ui, &ResultView::from_outcome(outcome), state.dark_mode);
    }
}

fn render_result(ui: &mut egui::Ui, view: &ResultView, dark: bool) {
    egui::Frame::group(ui.style())
        .fill(theme::background(dark))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(format!("Result: {}", view.headline))
                    .heading()
                    .color(theme::result_colour(view.style)),
            );
            ui.label(format!("Score: {}", view.score));
            if let Some(ref detail) = view.detail {
                ui.label(egui::RichText::new(detail).small().weak());
            }
        });
}
