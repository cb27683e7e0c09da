//! Rendering-toolkit seam: the block renderer the preview drives.
//!
//! The preview never draws blocks itself.  It registers block shapes in one
//! batch, injects a workspace with a fixed configuration, and then lets the
//! workspace paint into the container area.  Flyout capabilities vary across
//! toolkit versions, so each one defaults to a no-op.

use anyhow::Result;
use eframe::egui;

pub mod painted;

pub use painted::PaintedToolkit;

/// Zoom settings for an injected workspace.  The preview pins every scale
/// field to the same value so the surface cannot be zoomed at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomConfig {
    pub controls: bool,
    pub wheel: bool,
    pub start_scale: f32,
    pub max_scale: f32,
    pub min_scale: f32,
}

/// Injection options handed to [`RenderToolkit::inject`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceConfig {
    pub rtl: bool,
    pub scrollbars: bool,
    pub trashcan: bool,
    pub sounds: bool,
    pub toolbox: String,
    pub zoom: ZoomConfig,
}

impl WorkspaceConfig {
    /// The fixed preview configuration: no chrome, no interaction beyond the
    /// palette itself, zoom locked at `scale`.
    pub fn preview(toolbox: String, scale: f32) -> Self {
        Self {
            rtl: false,
            scrollbars: false,
            trashcan: false,
            sounds: false,
            toolbox,
            zoom: ZoomConfig {
                controls: false,
                wheel: false,
                start_scale: scale,
                max_scale: scale,
                min_scale: scale,
            },
        }
    }
}

/// The palette sub-view of a workspace.
///
/// Every method is an optional capability: toolkit versions that lack one
/// simply inherit the no-op default, and callers do not need to care.
pub trait Flyout {
    fn set_width(&mut self, _width: f32) {}
    fn reflow(&mut self) {}
    fn position(&mut self) {}
}

/// A live injected workspace.  Opaque beyond these operations.
pub trait Workspace {
    /// The flyout sub-view, when the toolkit created one.
    fn flyout(&mut self) -> Option<&mut dyn Flyout>;

    /// Release everything the workspace holds, including any visual content
    /// left in the container.  Called exactly once before the workspace is
    /// dropped.
    fn dispose(&mut self);

    /// Draw into the container area.  The default is a no-op for toolkits
    /// that render through their own surface.
    fn paint(&mut self, _ui: &mut egui::Ui) {}
}

/// Handle to the block-rendering toolkit.
pub trait RenderToolkit {
    /// Register a batch of block-shape descriptors.  One call per render
    /// pass, descriptors in palette order, before any injection.
    fn define_blocks(&self, json_blocks: &[serde_json::Value]) -> Result<()>;

    /// Create a workspace for `config` and return it live.
    fn inject(&self, config: &WorkspaceConfig) -> Result<Box<dyn Workspace>>;
}
