//! Scoped ownership of the one live preview workspace.

use anyhow::{Context, Result};
use eframe::egui;
use tracing::warn;

use crate::toolkit::{RenderToolkit, Workspace, WorkspaceConfig};

/// Fixed flyout width in display units.
pub const FLYOUT_WIDTH: f32 = 450.0;
/// The single locked zoom level of the preview surface.
pub const PREVIEW_SCALE: f32 = 0.85;

/// Holds at most one live workspace.
///
/// Disposal is idempotent and unconditional before every new acquisition, so
/// no render pass can observe two live workspaces or a container mixing a
/// stale surface with a new one.
#[derive(Default)]
pub struct WorkspaceSlot {
    workspace: Option<Box<dyn Workspace>>,
}

impl WorkspaceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.workspace.is_some()
    }

    /// Tear down whatever is live.  Safe to call any number of times.
    ///
    /// The flyout is owned by the workspace and gets no teardown call of its
    /// own; disposing the workspace takes it down too.
    pub fn dispose(&mut self) {
        if let Some(mut workspace) = self.workspace.take() {
            workspace.dispose();
        }
    }

    /// Inject a new workspace with the fixed preview configuration.
    ///
    /// The caller runs `dispose()` earlier in the same render pass; if
    /// injection fails nothing is retained and the error propagates for
    /// classification.
    pub fn materialize(&mut self, toolkit: &dyn RenderToolkit, toolbox_xml: String) -> Result<()> {
        debug_assert!(self.workspace.is_none(), "dispose() must run before materialize()");

        let config = WorkspaceConfig::preview(toolbox_xml, PREVIEW_SCALE);
        let mut workspace = toolkit
            .inject(&config)
            .context("workspace injection failed")?;

        match workspace.flyout() {
            Some(flyout) => {
                flyout.set_width(FLYOUT_WIDTH);
                flyout.reflow();
                flyout.position();
            }
            None => warn!("workspace created without a flyout"),
        }

        self.workspace = Some(workspace);
        Ok(())
    }

    /// Let the live workspace draw into the container area.
    pub fn paint(&mut self, ui: &mut egui::Ui) {
        if let Some(workspace) = &mut self.workspace {
            workspace.paint(ui);
        }
    }
}

impl Drop for WorkspaceSlot {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use anyhow::bail;

    use super::*;
    use crate::toolkit::Flyout;

    #[derive(Default)]
    struct CountingFlyout {
        width: Cell<f32>,
        reflowed: Cell<bool>,
        positioned: Cell<bool>,
    }

    struct CountingWorkspace {
        live: Rc<Cell<usize>>,
        flyout_handle: CountingFlyoutHandle,
    }

    struct CountingFlyoutHandle(Rc<CountingFlyout>);

    impl Flyout for CountingFlyoutHandle {
        fn set_width(&mut self, width: f32) {
            self.0.width.set(width);
        }
        fn reflow(&mut self) {
            self.0.reflowed.set(true);
        }
        fn position(&mut self) {
            self.0.positioned.set(true);
        }
    }

    impl Workspace for CountingWorkspace {
        fn flyout(&mut self) -> Option<&mut dyn Flyout> {
            Some(&mut self.flyout_handle)
        }
        fn dispose(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    struct CountingToolkit {
        live: Rc<Cell<usize>>,
        injected: Cell<usize>,
        flyout: Rc<CountingFlyout>,
        fail: Cell<bool>,
    }

    impl CountingToolkit {
        fn new() -> Self {
            Self {
                live: Rc::new(Cell::new(0)),
                injected: Cell::new(0),
                flyout: Rc::new(CountingFlyout::default()),
                fail: Cell::new(false),
            }
        }
    }

    impl RenderToolkit for CountingToolkit {
        fn define_blocks(&self, _json_blocks: &[serde_json::Value]) -> Result<()> {
            Ok(())
        }

        fn inject(&self, _config: &WorkspaceConfig) -> Result<Box<dyn Workspace>> {
            if self.fail.get() {
                bail!("injection exploded");
            }
            self.injected.set(self.injected.get() + 1);
            self.live.set(self.live.get() + 1);
            Ok(Box::new(CountingWorkspace {
                live: self.live.clone(),
                flyout_handle: CountingFlyoutHandle(self.flyout.clone()),
            }))
        }
    }

    #[test]
    fn dispose_is_idempotent_and_safe_when_empty() {
        let mut slot = WorkspaceSlot::new();
        slot.dispose();
        slot.dispose();
        assert!(!slot.is_live());
    }

    #[test]
    fn materialize_configures_flyout() {
        let toolkit = CountingToolkit::new();
        let mut slot = WorkspaceSlot::new();
        slot.materialize(&toolkit, "<xml/>".into()).unwrap();

        assert!(slot.is_live());
        assert_eq!(toolkit.flyout.width.get(), FLYOUT_WIDTH);
        assert!(toolkit.flyout.reflowed.get());
        assert!(toolkit.flyout.positioned.get());
    }

    #[test]
    fn at_most_one_workspace_across_rerenders() {
        let toolkit = CountingToolkit::new();
        let mut slot = WorkspaceSlot::new();
        for _ in 0..5 {
            slot.dispose();
            slot.materialize(&toolkit, "<xml/>".into()).unwrap();
        }
        assert_eq!(toolkit.injected.get(), 5);
        assert_eq!(toolkit.live.get(), 1);

        slot.dispose();
        assert_eq!(toolkit.live.get(), 0);
        slot.dispose();
        assert_eq!(toolkit.live.get(), 0);
    }

    #[test]
    fn failed_injection_retains_nothing() {
        let toolkit = CountingToolkit::new();
        toolkit.fail.set(true);
        let mut slot = WorkspaceSlot::new();
        assert!(slot.materialize(&toolkit, "<xml/>".into()).is_err());
        assert!(!slot.is_live());
        assert_eq!(toolkit.live.get(), 0);
    }

    #[test]
    fn drop_disposes_live_workspace() {
        let toolkit = CountingToolkit::new();
        {
            let mut slot = WorkspaceSlot::new();
            slot.materialize(&toolkit, "<xml/>".into()).unwrap();
            assert_eq!(toolkit.live.get(), 1);
        }
        assert_eq!(toolkit.live.get(), 0);
    }
}
