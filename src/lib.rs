//! UI component suite for authoring visual-programming extensions and
//! previewing their compiled block palette inline.
//!
//! The interesting piece is [`preview::BlockPreview`]: it reconciles the
//! source text, the runtime's block registry and the host's load flags into
//! one display state per pass, and owns the lifecycle of the injected block
//! workspace.  Everything else — editor panel, host state, demo app — is
//! presentation glue around it.

pub mod app_state;
pub mod editor;
pub mod preview;
pub mod runtime;
pub mod toolkit;
pub mod ui;
