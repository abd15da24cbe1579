// AnomalyDash - ui/theme.rs
//
// Palette, verdict colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::Verdict;
use egui::Color32;

/// Accent used for headings, the chart line, and key figures.
pub const PRIMARY: Color32 = Color32::from_rgb(0x00, 0xff, 0x9f);

/// Darker accent for text on light backgrounds, where PRIMARY washes out.
pub const PRIMARY_ON_LIGHT: Color32 = Color32::from_rgb(0x00, 0x99, 0x5f);

/// Secondary accent (anomaly markers).
pub const SECONDARY: Color32 = Color32::from_rgb(0xff, 0x40, 0x81);

/// Result block colours.
pub const ERROR_COLOUR: Color32 = Color32::from_rgb(244, 67, 54); // Red 500
pub const SUCCESS_COLOUR: Color32 = Color32::from_rgb(76, 175, 80); // Green 500
pub const WARNING_COLOUR: Color32 = Color32::from_rgb(255, 152, 0); // Orange 500

/// Layout constants.
pub const TOP_CARD_HEIGHT: f32 = 400.0;
pub const BOTTOM_CARD_HEIGHT: f32 = 240.0;
pub const CARD_SPACING: f32 = 12.0;

/// Window background.
pub fn background(dark: bool) -> Color32 {
    if dark {
        Color32::from_rgb(0x12, 0x12, 0x12)
    } else {
        Color32::from_rgb(0xf5, 0xf5, 0xf5)
    }
}

/// Card ("paper") background.
pub fn paper(dark: bool) -> Color32 {
    if dark {
        Color32::from_rgb(0x1e, 0x1e, 0x1e)
    } else {
        Color32::WHITE
    }
}

/// Accent colour readable on the current background.
pub fn accent(dark: bool) -> Color32 {
    if dark {
        PRIMARY
    } else {
        PRIMARY_ON_LIGHT
    }
}

/// Styling applied to a result block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStyle {
    Error,
    Success,
    Warning,
}

/// Map a verdict to its result block style. A failed request gets its own
/// style rather than passing for a good part.
pub fn result_style(verdict: Verdict) -> ResultStyle {
    match verdict {
        Verdict::Defect => ResultStyle::Error,
        Verdict::Good => ResultStyle::Success,
        Verdict::Error => ResultStyle::Warning,
    }
}

pub fn result_colour(style: ResultStyle) -> Color32 {
    match style {
        ResultStyle::Error => ERROR_COLOUR,
        ResultStyle::Success => SUCCESS_COLOUR,
        ResultStyle::Warning => WARNING_COLOUR,
    }
}

/// Install the dark or light palette on `ctx`.
pub fn apply(ctx: &egui::Context, dark: bool) {
    let mut visuals = if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.panel_fill = background(dark);
    visuals.window_fill = paper(dark);
    visuals.selection.bg_fill = accent(dark).gamma_multiply(0.5);
    visuals.hyperlink_color = accent(dark);
    ctx.set_visuals(visuals);
}
