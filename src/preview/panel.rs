//! Static display table and the placeholder panels it feeds.
//!
//! Every display state maps to exactly one presentation; the mapping is the
//! exhaustive match in [`text_for`], not branching logic at the call sites.

use eframe::egui;

use super::state::DisplayState;

const INFO_FG: egui::Color32 = egui::Color32::from_rgb(180, 180, 180);
const ERROR_FG: egui::Color32 = egui::Color32::from_rgb(255, 68, 68);
const PANEL_BG: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

/// Title / detail / hint for one placeholder panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelText<'a> {
    pub tone: Tone,
    pub title: &'a str,
    pub detail: Option<&'a str>,
    pub hint: Option<&'a str>,
}

const RUN_HINT: &str = "Click \"Run Extension\" button to load block preview";

/// The display table.  `Rendered` and `Cleared` intentionally carry no text:
/// the former paints through the workspace, the latter shows a blank surface.
pub fn text_for(state: &DisplayState) -> PanelText<'_> {
    match state {
        DisplayState::Loading => PanelText {
            tone: Tone::Info,
            title: "Loading extension...",
            detail: None,
            hint: Some("Please wait"),
        },
        DisplayState::LoadError(message) => PanelText {
            tone: Tone::Error,
            title: "Load failed",
            detail: Some(message),
            hint: Some("Please check the code syntax and try again"),
        },
        DisplayState::NoRuntime(_) => PanelText {
            tone: Tone::Info,
            title: "Please run the extension first",
            detail: None,
            hint: Some(RUN_HINT),
        },
        DisplayState::Cleared => PanelText {
            tone: Tone::Info,
            title: "",
            detail: None,
            hint: None,
        },
        DisplayState::NotLoaded => PanelText {
            tone: Tone::Info,
            title: "Extension not loaded",
            detail: None,
            hint: Some(RUN_HINT),
        },
        DisplayState::NoBlocksDefined => PanelText {
            tone: Tone::Info,
            title: "No blocks defined",
            detail: None,
            hint: None,
        },
        DisplayState::NoBlocksXml => PanelText {
            tone: Tone::Info,
            title: "No blocks XML",
            detail: None,
            hint: None,
        },
        DisplayState::Rendered => PanelText {
            tone: Tone::Info,
            title: "",
            detail: None,
            hint: None,
        },
        DisplayState::RenderFailed { message, trace } => PanelText {
            tone: Tone::Error,
            title: "Render failed",
            detail: Some(message),
            hint: Some(
                trace
                    .as_deref()
                    .unwrap_or("Please check if block definition is correct"),
            ),
        },
    }
}

/// Draw the placeholder panel for `state` into the container area.
pub fn show_placeholder(ui: &mut egui::Ui, state: &DisplayState) {
    let text = text_for(state);

    egui::Frame::none()
        .fill(PANEL_BG)
        .inner_margin(egui::vec2(24.0, 24.0))
        .show(ui, |ui| {
            ui.set_min_size(ui.available_size());
            if text.title.is_empty() {
                return;
            }

            let fg = match text.tone {
                Tone::Info => INFO_FG,
                Tone::Error => ERROR_FG,
            };
            let title = match text.tone {
                Tone::Info => text.title.to_string(),
                Tone::Error => format!("✕ {}", text.title),
            };

            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.label(egui::RichText::new(title).color(fg).size(14.0));
                if let Some(detail) = text.detail {
                    ui.add_space(10.0);
                    ui.label(egui::RichText::new(detail).color(fg).size(12.0));
                }
                if let Some(hint) = text.hint {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(hint)
                            .color(INFO_FG.gamma_multiply(0.7))
                            .size(11.0),
                    );
                }
            });
        });
}
