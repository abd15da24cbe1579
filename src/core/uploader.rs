// AnomalyDash - core/uploader.rs
//
// Image uploader form state machine: Empty -> Ready -> Submitted.
//
// Pure state with no I/O. The app layer turns a `SubmitRequest` into a
// background detection and feeds the outcome back through `complete`.
// A `pending` flag guards against re-entrant submits; each request carries
// a ticket so a response for a file that has since been replaced is charted
// but never shown against the new file.

use crate::core::model::{ChartPoint, DetectionOutcome, DetectionResult, ModelId};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// An image the user has picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
    /// File name shown in the panel and sent as the multipart file name.
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl SelectedImage {
    pub fn new(path: PathBuf, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self {
            path,
            name,
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// Visible phase of the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploaderPhase {
    /// No file chosen.
    Empty,
    /// File chosen, no result displayed.
    Ready,
    /// Result displayed.
    Submitted,
}

/// Everything the worker needs to run one detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub ticket: u64,
    pub image: SelectedImage,
    pub model: ModelId,
}

/// A finished submission, ready for the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub result: DetectionResult,
    pub point: ChartPoint,
    /// False when the image was replaced while the request was in flight;
    /// the panel keeps showing the new file without a result.
    pub displayed: bool,
}

/// Why a submit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// No image has been selected.
    NoImage,
    /// A previous submission has not completed yet.
    InFlight,
}

impl fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImage => f.write_str("Please select an image"),
            Self::InFlight => f.write_str("A detection is already in progress"),
        }
    }
}

/// Form state owned by the uploader panel.
#[derive(Debug, Clone)]
pub struct UploaderState {
    image: Option<SelectedImage>,
    model: ModelId,
    last_outcome: Option<DetectionOutcome>,
    /// Ticket of the request in flight, if any.
    pending: Option<u64>,
    /// Ticket whose response should be displayed; `None` once the file changes.
    current_ticket: Option<u64>,
    next_ticket: u64,
}

impl UploaderState {
    pub fn new(model: ModelId) -> Self {
        Self {
            image: None,
            model,
            last_outcome: None,
            pending: None,
            current_ticket: None,
            next_ticket: 1,
        }
    }

    pub fn phase(&self) -> UploaderPhase {
        match (&self.image, &self.last_outcome) {
            (None, _) => UploaderPhase::Empty,
            (Some(_), None) => UploaderPhase::Ready,
            (Some(_), Some(_)) => UploaderPhase::Submitted,
        }
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn last_outcome(&self) -> Option<&DetectionOutcome> {
        self.last_outcome.as_ref()
    }

    /// True while a submission is awaiting its response.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the submit control is actionable.
    pub fn can_submit(&self) -> bool {
        self.image.is_some() && self.pending.is_none()
    }

    /// Choose a new image. Clears the displayed result and detaches any
    /// in-flight request from the display.
    pub fn select_file(&mut self, image: SelectedImage) {
        tracing::debug!(file = %image.name, "Image selected");
        self.image = Some(image);
        self.last_outcome = None;
        self.current_ticket = None;
    }

    pub fn select_model(&mut self, model: ModelId) {
        self.model = model;
    }

    /// Start a submission for the current image and model.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmitRejected> {
        if self.pending.is_some() {
            return Err(SubmitRejected::InFlight);
        }
        let image = self.image.clone().ok_or(SubmitRejected::NoImage)?;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.current_ticket = Some(ticket);
        Ok(SubmitRequest {
            ticket,
            image,
            model: self.model,
        })
    }

    /// Record the outcome of `ticket`.
    ///
    /// Every response yields a chart point. Only the outcome for the current
    /// image is stored for display.
    pub fn complete(
        &mut self,
        ticket: u64,
        outcome: DetectionOutcome,
        now: DateTime<Local>,
    ) -> Completion {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
        let result = outcome.display_result();
        let point = ChartPoint::from_result(&result, now);
        let displayed = self.current_ticket == Some(ticket);
        if displayed {
            self.last_outcome = Some(outcome);
        } else {
            tracing::debug!(ticket, "Outcome for a replaced image, charting only");
        }
        Completion {
            result,
            point,
            displayed,
        }
    }
}

impl Default for UploaderState {
    fn default() -> Self {
        Self::new(ModelId::default())
    }
}
