//! Dynamic block-preview renderer.
//!
//! Reconciles three independently-changing inputs — the raw extension
//! source, the runtime's block registry, and the host's load flags — into a
//! single display state, and owns the lifecycle of the injected preview
//! workspace (at most one live, disposed before every re-acquisition and on
//! teardown).

pub mod extension_id;
pub mod panel;
pub mod state;
pub mod subscriber;
pub mod toolbox;
pub mod workspace;

use std::rc::Rc;

use eframe::egui;
use tracing::error;

use crate::runtime::RuntimeHandle;
use crate::toolkit::RenderToolkit;

use state::{DisplayState, NoRuntimeReason, PreviewInputs, Resolution};
use subscriber::RegistrySubscription;
use toolbox::ToolboxPlan;
use workspace::WorkspaceSlot;

/// Host-owned inputs, pushed on every frame.
pub struct PreviewProps<'a> {
    pub source: &'a str,
    pub is_loading: bool,
    pub load_error: Option<&'a str>,
    pub active_tab: &'a str,
    pub runtime: Option<&'a Rc<dyn RuntimeHandle>>,
    pub toolkit: Option<&'a Rc<dyn RenderToolkit>>,
}

/// Change-detection snapshot of the trigger set.  Handle identity is pointer
/// identity, matching the subscription's notion of "same runtime".
#[derive(PartialEq)]
struct Fingerprint {
    source: String,
    is_loading: bool,
    load_error: Option<String>,
    active_tab: String,
    runtime: Option<*const ()>,
    toolkit: Option<*const ()>,
}

impl Fingerprint {
    fn of(props: &PreviewProps<'_>) -> Self {
        Self {
            source: props.source.to_string(),
            is_loading: props.is_loading,
            load_error: props.load_error.map(str::to_string),
            active_tab: props.active_tab.to_string(),
            runtime: props.runtime.map(|r| Rc::as_ptr(r) as *const ()),
            toolkit: props.toolkit.map(|t| Rc::as_ptr(t) as *const ()),
        }
    }
}

/// The block-preview component.  One instance per mount container.
#[derive(Default)]
pub struct BlockPreview {
    slot: WorkspaceSlot,
    subscription: RegistrySubscription,
    display: DisplayState,
    fingerprint: Option<Fingerprint>,
}

impl BlockPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active display state.
    pub fn display_state(&self) -> &DisplayState {
        &self.display
    }

    /// Run one reconciliation pass without drawing.
    ///
    /// Re-evaluates when any trigger input changed or a registry-updated
    /// notification arrived since the last pass; otherwise keeps the current
    /// state and workspace untouched.
    pub fn update(&mut self, props: &PreviewProps<'_>) {
        self.subscription.sync(props.runtime);

        let fingerprint = Fingerprint::of(props);
        let notified = self.subscription.take_dirty();
        if !notified && self.fingerprint.as_ref() == Some(&fingerprint) {
            return;
        }
        self.fingerprint = Some(fingerprint);
        self.refresh(props);
    }

    /// Reconcile and draw into the container area.
    pub fn show(&mut self, ui: &mut egui::Ui, props: &PreviewProps<'_>) {
        self.update(props);

        if self.display == DisplayState::Rendered {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(30, 30, 30))
                .inner_margin(egui::vec2(16.0, 8.0))
                .show(ui, |ui| {
                    ui.set_min_size(ui.available_size());
                    self.slot.paint(ui);
                });
        } else {
            panel::show_placeholder(ui, &self.display);
        }
    }

    fn refresh(&mut self, props: &PreviewProps<'_>) {
        let registry = props.runtime.map(|runtime| runtime.block_registry());
        let inputs = PreviewInputs {
            source: props.source,
            is_loading: props.is_loading,
            load_error: props.load_error,
            runtime_attached: props.runtime.is_some(),
            toolkit_attached: props.toolkit.is_some(),
        };

        // Dispose before anything else: no pass may observe a stale
        // workspace next to the new outcome.
        self.slot.dispose();

        match state::resolve(&inputs, registry.as_deref()) {
            Resolution::Show(display) => self.display = display,
            Resolution::Render(plan) => {
                let Some(toolkit) = props.toolkit else {
                    self.display = DisplayState::NoRuntime(NoRuntimeReason::HandleMissing);
                    return;
                };
                match self.render_plan(toolkit.as_ref(), &plan) {
                    Ok(display) => self.display = display,
                    Err(err) => {
                        self.slot.dispose();
                        let message = err.to_string();
                        let chain = format!("{err:#}");
                        let trace = (chain != message).then_some(chain);
                        error!(error = %err, "block preview render failed");
                        self.display = DisplayState::RenderFailed { message, trace };
                    }
                }
            }
        }
    }

    fn render_plan(
        &mut self,
        toolkit: &dyn RenderToolkit,
        plan: &ToolboxPlan,
    ) -> anyhow::Result<DisplayState> {
        // Shapes register before the markup stage is consulted; a record
        // with shapes but no xml still reaches the registrar.
        toolkit.define_blocks(&plan.json_blocks)?;
        let markup = match plan.require_markup() {
            Ok(markup) => markup,
            Err(_) => return Ok(DisplayState::NoBlocksXml),
        };
        self.slot.materialize(toolkit, markup.to_string())?;
        Ok(DisplayState::Rendered)
    }
}
