//! Thin code-editing panel for the extension source.
//!
//! Text-manipulation mechanics beyond a highlighted multiline edit are
//! delegated to egui's `TextEdit`; this module only owns the header bar and
//! the run-extension wiring.

use eframe::egui;

use crate::app_state::EditorState;

pub fn show(ui: &mut egui::Ui, state: &mut EditorState) {
    let top_bar_bg = egui::Color32::from_rgb(37, 37, 38);
    let top_bar_stroke = egui::Color32::from_rgb(51, 51, 51);
    let gutter_bg = egui::Color32::from_rgb(30, 30, 30);
    let gutter_fg = egui::Color32::from_rgb(133, 133, 133);

    // Header bar: filename on the left, Run on the right.
    egui::Frame::none()
        .fill(top_bar_bg)
        .inner_margin(egui::vec2(16.0, 8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("📄 extension.js")
                        .color(egui::Color32::from_rgb(224, 224, 224))
                        .size(13.0),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let run = ui.add_enabled(
                        !state.is_loading,
                        egui::Button::new(egui::RichText::new("▶ Run Extension").size(12.0)),
                    );
                    if run.clicked() {
                        state.request_run();
                        ui.ctx().request_repaint();
                    }
                    if let Some(error) = &state.load_error {
                        ui.label(
                            egui::RichText::new(error)
                                .color(egui::Color32::from_rgb(255, 68, 68))
                                .size(11.0),
                        );
                    }
                });
            });
        });

    let rect = ui.max_rect();
    ui.painter().hline(
        rect.x_range(),
        ui.cursor().top(),
        egui::Stroke::new(1.0, top_bar_stroke),
    );
    ui.add_space(1.0);

    let theme = egui_extras::syntax_highlighting::CodeTheme::from_memory(ui.ctx());
    let mut layouter = |ui: &egui::Ui, string: &str, _wrap_width: f32| {
        let mut layout_job =
            egui_extras::syntax_highlighting::highlight(ui.ctx(), &theme, string, "js");
        // No wrapping: keeps the gutter line numbers aligned.
        layout_job.wrap.max_width = f32::INFINITY;
        ui.fonts(|f| f.layout_job(layout_job))
    };

    let font_id = egui::TextStyle::Monospace.resolve(ui.style());
    let row_height = ui.fonts(|f| f.row_height(&font_id));
    let available_height = ui.available_height();

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;

                let num_lines = state.source.split('\n').count().max(1);
                let digits = num_lines.to_string().len().max(2);
                let gutter_width =
                    digits as f32 * ui.fonts(|f| f.glyph_width(&font_id, '0')) + 24.0;
                let content_height = (num_lines as f32 * row_height).max(available_height);

                let (gutter_rect, _) = ui.allocate_exact_size(
                    egui::vec2(gutter_width, content_height),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(gutter_rect, 0.0, gutter_bg);
                for i in 1..=num_lines {
                    let y = gutter_rect.top() + (i - 1) as f32 * row_height;
                    let galley = ui.fonts(|f| {
                        f.layout(i.to_string(), font_id.clone(), gutter_fg, gutter_width - 8.0)
                    });
                    let x = gutter_rect.right() - 12.0 - galley.rect.width();
                    ui.painter()
                        .galley(egui::pos2(x, y), galley, egui::Color32::PLACEHOLDER);
                }

                ui.add_space(4.0);
                let output = egui::TextEdit::multiline(&mut state.source)
                    .font(egui::TextStyle::Monospace)
                    .frame(false)
                    .desired_width(f32::INFINITY)
                    .margin(egui::vec2(0.0, 0.0))
                    .lock_focus(true)
                    .layouter(&mut layouter)
                    .show(ui);

                if output.response.changed() {
                    // Stale diagnostics are misleading once the source moved on.
                    state.load_error = None;
                }
            });
        });
}
