// AnomalyDash - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state), core (read-only models), egui.
// Must NOT depend on: platform, direct I/O.

pub mod panels;
pub mod theme;

/// Draw a fixed-height card with the paper background and a heading.
pub fn card(
    ui: &mut egui::Ui,
    title: &str,
    height: f32,
    dark: bool,
    add_contents: impl FnOnce(&mut egui::Ui),
) {
    egui::Frame::group(ui.style())
        .fill(theme::paper(dark))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.set_min_height(height);
            ui.label(
                egui::RichText::new(title)
                    .heading()
                    .color(theme::accent(dark)),
            );
            ui.add_space(6.0);
            add_contents(ui);
        });
}
