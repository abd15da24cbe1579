// AnomalyDash - ui/panels/chart.rs
//
// Line chart of the rolling detection history, painted directly with the
// egui painter: dashed grid, y-axis value labels, x-axis time labels, one
// marker per detection (anomalies in the secondary colour), and a hover
// tooltip on the nearest point.

use crate::app::state::AppState;
use crate::core::history::History;
use crate::ui::theme;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};

/// Space reserved around the plot area for axis labels.
const MARGIN_LEFT: f32 = 40.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 16.0;
const MARGIN_BOTTOM: f32 = 36.0;

/// Number of horizontal grid intervals.
const Y_TICKS: usize = 4;

/// Painted area height; the card heading and legend line take the rest.
const CHART_HEIGHT: f32 = theme::TOP_CARD_HEIGHT - 70.0;

const MARKER_RADIUS: f32 = 4.0;
const ACTIVE_MARKER_RADIUS: f32 = 8.0;

/// Upper bound of the y axis: at least 100, otherwise the largest value
/// rounded up to the next multiple of 10.
pub fn y_axis_max(history: &History) -> f64 {
    let max = history.max_value().unwrap_or(0.0);
    if max <= 100.0 {
        100.0
    } else {
        (max / 10.0).ceil() * 10.0
    }
}

/// Screen positions of `values` inside `plot`, evenly spaced on x.
///
/// A single value is centred horizontally. Values are clamped to
/// `0..=y_max` so a negative score never leaves the plot.
pub fn plot_positions(values: &[f64], plot: Rect, y_max: f64) -> Vec<Pos2> {
    let n = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = if n <= 1 {
                plot.center().x
            } else {
                plot.left() + plot.width() * i as f32 / (n - 1) as f32
            };
            let frac = if y_max > 0.0 {
                (v / y_max).clamp(0.0, 1.0) as f32
            } else {
                0.0
            };
            Pos2::new(x, plot.bottom() - plot.height() * frac)
        })
        .collect()
}

/// Index of the position closest to `pointer_x`, if any.
pub fn nearest_index(positions: &[Pos2], pointer_x: f32) -> Option<usize> {
    positions
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.x - pointer_x)
                .abs()
                .total_cmp(&(b.x - pointer_x).abs())
        })
        .map(|(i, _)| i)
}

/// Render the chart card contents.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    let history = &state.history;
    let dark = state.dark_mode;

    if history.is_empty() {
        ui.add_space(CHART_HEIGHT / 2.0 - 20.0);
        ui.vertical_centered(|ui| {
            ui.label("No detections yet.");
            ui.label("Submit an image to start the chart.");
        });
        return;
    }

    let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let outer = response.rect;
    let plot = Rect::from_min_max(
        Pos2::new(outer.left() + MARGIN_LEFT, outer.top() + MARGIN_TOP),
        Pos2::new(outer.right() - MARGIN_RIGHT, outer.bottom() - MARGIN_BOTTOM),
    );
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return;
    }

    let text_colour = ui.style().visuals.text_color();
    let grid_stroke = Stroke::new(1.0, ui.style().visuals.weak_text_color().gamma_multiply(0.4));
    let label_font = FontId::proportional(11.0);
    let y_max = y_axis_max(history);

    // Horizontal grid + y labels.
    for tick in 0..=Y_TICKS {
        let frac = tick as f32 / Y_TICKS as f32;
        let y = plot.bottom() - plot.height() * frac;
        painter.extend(Shape::dashed_line(
            &[Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            grid_stroke,
            3.0,
            3.0,
        ));
        painter.text(
            Pos2::new(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{:.0}", y_max * f64::from(frac)),
            label_font.clone(),
            text_colour,
        );
    }

    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let positions = plot_positions(&values, plot, y_max);

    // Vertical grid + x labels.
    for (pos, point) in positions.iter().zip(history.iter()) {
        painter.extend(Shape::dashed_line(
            &[Pos2::new(pos.x, plot.top()), Pos2::new(pos.x, plot.bottom())],
            grid_stroke,
            3.0,
            3.0,
        ));
        painter.text(
            Pos2::new(pos.x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            &point.time,
            label_font.clone(),
            text_colour,
        );
    }

    if positions.len() > 1 {
        painter.add(Shape::line(positions.clone(), Stroke::new(2.0, theme::PRIMARY)));
    }
    for (pos, point) in positions.iter().zip(history.iter()) {
        let colour = if point.anomaly {
            theme::SECONDARY
        } else {
            theme::PRIMARY
        };
        painter.circle_filled(*pos, MARKER_RADIUS, colour);
    }

    let hovered = response
        .hover_pos()
        .filter(|p| plot.expand(ACTIVE_MARKER_RADIUS).contains(*p))
        .and_then(|p| nearest_index(&positions, p.x));

    if let Some(i) = hovered {
        if let (Some(pos), Some(point)) = (positions.get(i), history.iter().nth(i)) {
            painter.circle_stroke(*pos, ACTIVE_MARKER_RADIUS, Stroke::new(2.0, theme::PRIMARY));
            let time = point.time.clone();
            let value = point.value;
            let anomaly = point.anomaly;
            response.on_hover_ui_at_pointer(|ui| {
                ui.label(egui::RichText::new(time).strong());
                ui.label(format!("value: {value:.2}"));
                if anomaly {
                    ui.colored_label(theme::SECONDARY, "anomaly");
                }
            });
        }
    }

    ui.horizontal(|ui| {
        ui.add_space(MARGIN_LEFT);
        ui.label(egui::RichText::new("\u{2014}").color(theme::PRIMARY).strong());
        ui.label("value");
        ui.label(egui::RichText::new("\u{25cf}").color(theme::SECONDARY));
        ui.label(egui::RichText::new("anomaly").color(if dark {
            Color32::LIGHT_GRAY
        } else {
            Color32::DARK_GRAY
        }));
    });
}
