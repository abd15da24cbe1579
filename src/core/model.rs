// AnomalyDash - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::{FailureKind, PredictError};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Model identifiers
// =============================================================================

/// Backend algorithm variant that performs the classification.
///
/// This is a closed enumeration. Which variants are offered in the UI is
/// configuration (`[models] offered`), not part of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelId {
    #[default]
    Padim,
    EfficientAd,
    UniNet,
}

impl ModelId {
    /// Returns all variants in display order.
    pub fn all() -> &'static [ModelId] {
        &[ModelId::Padim, ModelId::EfficientAd, ModelId::UniNet]
    }

    /// Models offered in the selector when config does not say otherwise.
    /// EfficientAD is defined but not offered.
    pub fn default_offered() -> Vec<ModelId> {
        vec![ModelId::Padim, ModelId::UniNet]
    }

    /// Identifier sent in the `model` multipart field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Padim => "padim",
            Self::EfficientAd => "efficientad",
            Self::UniNet => "uninet",
        }
    }

    /// Name shown in the model selector.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Padim => "PaDiM",
            Self::EfficientAd => "EfficientAD",
            Self::UniNet => "UniNet",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ModelId::all()
            .iter()
            .copied()
            .find(|m| m.wire_name() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = ModelId::all().iter().map(|m| m.wire_name()).collect();
                format!("unknown model '{s}' (expected one of: {})", valid.join(", "))
            })
    }
}

// =============================================================================
// Detection results
// =============================================================================

/// Classification verdict.
///
/// `Error` never comes from the service; it marks the display sentinel that
/// stands in for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Defect,
    Good,
    Error,
}

impl Verdict {
    /// Heading shown in the result block.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Defect => "Defect Detected",
            Self::Good => "Good",
            Self::Error => "Detection Failed",
        }
    }
}

/// Normalised detection result: `{ result, score }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub result: Verdict,
    pub score: f64,
}

impl DetectionResult {
    /// The `{result: "error", score: 0}` display sentinel.
    pub fn error_sentinel() -> Self {
        Self {
            result: Verdict::Error,
            score: 0.0,
        }
    }

    /// True when the service reported a defect.
    pub fn is_anomaly(&self) -> bool {
        self.result == Verdict::Defect
    }

    /// Score formatted for display (two decimal places).
    pub fn score_label(&self) -> String {
        format!("{:.2}", self.score)
    }
}

/// Outcome of one submission, with the failure kind preserved.
///
/// Collapsed to a [`DetectionResult`] only at the display/history boundary
/// via [`DetectionOutcome::display_result`].
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    Detected(DetectionResult),
    Failed { kind: FailureKind, message: String },
}

impl DetectionOutcome {
    /// The result to display and chart; failures become the error sentinel.
    pub fn display_result(&self) -> DetectionResult {
        match self {
            Self::Detected(result) => *result,
            Self::Failed { .. } => DetectionResult::error_sentinel(),
        }
    }

    /// Failure kind, if this outcome is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Detected(_) => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<DetectionResult, PredictError>> for DetectionOutcome {
    fn from(r: Result<DetectionResult, PredictError>) -> Self {
        match r {
            Ok(result) => Self::Detected(result),
            Err(e) => Self::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

// =============================================================================
// Chart points
// =============================================================================

/// One point on the rolling detection chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Local wall-clock time of the detection.
    pub time: String,
    /// Score scaled to a percentage (score x 100).
    pub value: f64,
    /// True when the verdict was `defect`.
    pub anomaly: bool,
}

impl ChartPoint {
    /// Derive a chart point from a result observed at `at`.
    pub fn from_result(result: &DetectionResult, at: DateTime<Local>) -> Self {
        Self {
            time: at
                .format(crate::util::constants::CHART_TIME_FORMAT)
                .to_string(),
            value: result.score * 100.0,
            anomaly: result.is_anomaly(),
        }
    }
}
