use std::rc::Rc;

use eframe::egui;

use crate::app_state::EditorState;
use crate::preview::{BlockPreview, PreviewProps};
use crate::runtime::RuntimeHandle;
use crate::toolkit::RenderToolkit;
use crate::editor;

pub struct StudioApp {
    state: EditorState,
    preview: BlockPreview,
}

pub fn create_app() -> StudioApp {
    StudioApp {
        state: EditorState::default(),
        preview: BlockPreview::new(),
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        if state.tick() {
            ctx.request_repaint();
        }

        egui::SidePanel::left("editor_panel")
            .resizable(true)
            .default_width(480.0)
            .show(ctx, |ui| {
                editor::show(ui, state);
            });

        // Coercing the session handles per frame keeps the preview's
        // identity checks on the same allocations.
        let runtime_handle: Option<Rc<dyn RuntimeHandle>> =
            state.runtime.clone().map(|r| r as Rc<dyn RuntimeHandle>);
        let toolkit_handle: Option<Rc<dyn RenderToolkit>> =
            state.toolkit.clone().map(|t| t as Rc<dyn RenderToolkit>);

        egui::CentralPanel::default().show(ctx, |ui| {
            let props = PreviewProps {
                source: &state.source,
                is_loading: state.is_loading,
                load_error: state.load_error.as_deref(),
                active_tab: &state.active_tab,
                runtime: runtime_handle.as_ref(),
                toolkit: toolkit_handle.as_ref(),
            };
            self.preview.show(ui, &props);
        });
    }
}
