// AnomalyDash - app/state.rs
//
// Application state: theme, bounded detection history, uploader form
// state, and the status line. Owned by the eframe::App implementation.
//
// Panels never call the network. They mutate form state directly and set
// `request_submit`; the app loop turns that into a background detection.

use crate::core::history::History;
use crate::core::model::{ChartPoint, DetectionOutcome, DetectionResult, ModelId};
use crate::core::uploader::{SelectedImage, SubmitRejected, SubmitRequest, UploaderState};
use chrono::{DateTime, Local};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use std::path::Path;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Dark (true) or light (false) palette.
    pub dark_mode: bool,

    /// Rolling window of recent detections.
    pub history: History,

    /// Most recent result reported by the uploader. Stored, not displayed.
    pub last_result: Option<DetectionResult>,

    /// Uploader form state.
    pub uploader: UploaderState,

    /// Models offered in the selector, in display order.
    pub offered_models: Vec<ModelId>,

    /// Upload size limit applied when an image is picked.
    pub max_image_bytes: u64,

    /// Endpoint shown in the status bar.
    pub endpoint: String,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings from startup (config validation).
    pub warnings: Vec<String>,

    /// Set by the uploader panel when the submit button is clicked.
    pub request_submit: bool,

    /// Whether to show the About window.
    pub show_about: bool,
}

impl AppState {
    /// Create initial state from validated configuration.
    pub fn new(config: &AppConfig, dark_mode: bool, endpoint: String) -> Self {
        Self {
            dark_mode,
            history: History::default(),
            last_result: None,
            uploader: UploaderState::new(config.default_model),
            offered_models: config.offered_models.clone(),
            max_image_bytes: config.max_image_bytes,
            endpoint,
            status_message: "Ready. Select an image to begin.".to_string(),
            warnings: Vec::new(),
            request_submit: false,
            show_about: false,
        }
    }

    /// Flip between dark and light palettes.
    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        tracing::debug!(dark_mode = self.dark_mode, "Theme toggled");
    }

    /// Record a finished detection: keep the result and append its chart
    /// point, truncating history to its capacity.
    pub fn handle_result_change(&mut self, result: DetectionResult, point: ChartPoint) {
        self.last_result = Some(result);
        self.history.append(point);
    }

    /// Fold a worker outcome into the uploader and the history.
    ///
    /// Every finished submission is charted, including one whose image was
    /// replaced while it ran; only the current image's result is displayed.
    pub fn apply_outcome(&mut self, ticket: u64, outcome: DetectionOutcome, now: DateTime<Local>) {
        let status = match outcome.failure_kind() {
            Some(kind) => format!("Detection failed: {kind}."),
            None => {
                let r = outcome.display_result();
                format!("{} (score {}).", r.result.headline(), r.score_label())
            }
        };
        let done = self.uploader.complete(ticket, outcome, now);
        self.status_message = if done.displayed {
            status
        } else {
            format!("Previous image: {status}")
        };
        self.handle_result_change(done.result, done.point);
    }

    /// Validate `path` and make it the selected image.
    ///
    /// On rejection the current selection is left untouched and the status
    /// line explains why.
    pub fn pick_image(&mut self, path: &Path) {
        match fs::probe_image(path, self.max_image_bytes) {
            Ok(probe) => {
                let image =
                    SelectedImage::new(path.to_path_buf(), probe.mime_type, probe.size_bytes);
                self.status_message = format!("Selected {}.", image.name);
                self.uploader.select_file(image);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image rejected");
                self.status_message = e.to_string();
            }
        }
    }

    /// Consume a pending submit request, if any, and start it on the uploader.
    pub fn take_submit(&mut self) -> Option<SubmitRequest> {
        if !std::mem::take(&mut self.request_submit) {
            return None;
        }
        match self.uploader.begin_submit() {
            Ok(req) => {
                self.status_message = format!(
                    "Detecting anomalies in {} with {}\u{2026}",
                    req.image.name, req.model
                );
                Some(req)
            }
            Err(SubmitRejected::InFlight) => {
                tracing::debug!("Ignoring submit while a detection is pending");
                None
            }
            Err(e @ SubmitRejected::NoImage) => {
                self.status_message = e.to_string();
                None
            }
        }
    }
}
