//! The preview state machine: one total function from inputs to outcome.
//!
//! Every render trigger re-runs [`resolve`] against a fresh registry
//! snapshot.  The precedence order is strict and first-match-wins; exactly
//! one display state (or a render plan) comes out.

use tracing::warn;

use super::toolbox::{self, ToolboxError, ToolboxPlan};
use crate::runtime::BlockDefinition;

/// Why the preview is showing the "run the extension first" panel.
///
/// The two reasons share one presentation on purpose: whether the runtime
/// handle is missing or merely empty, the fix for the user is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRuntimeReason {
    HandleMissing,
    RegistryEmpty,
}

/// The single source of visual truth.  Exactly one variant is active at any
/// time; transitions happen only on input changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayState {
    Loading,
    LoadError(String),
    NoRuntime(NoRuntimeReason),
    #[default]
    Cleared,
    NotLoaded,
    NoBlocksDefined,
    NoBlocksXml,
    Rendered,
    RenderFailed {
        message: String,
        trace: Option<String>,
    },
}

/// Host-pushed inputs for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct PreviewInputs<'a> {
    pub source: &'a str,
    pub is_loading: bool,
    pub load_error: Option<&'a str>,
    pub runtime_attached: bool,
    pub toolkit_attached: bool,
}

/// Outcome of one evaluation: either a terminal display state or a plan the
/// component should materialize (dispose → register → inject).
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Show(DisplayState),
    Render(ToolboxPlan),
}

/// Evaluate the precedence ladder against `inputs` and a registry snapshot
/// (`None` when no runtime handle is attached).
pub fn resolve(inputs: &PreviewInputs<'_>, registry: Option<&[BlockDefinition]>) -> Resolution {
    use DisplayState::*;

    if inputs.is_loading {
        return Resolution::Show(Loading);
    }

    if let Some(error) = inputs.load_error {
        if !error.is_empty() {
            return Resolution::Show(LoadError(error.to_string()));
        }
    }

    if !inputs.runtime_attached || !inputs.toolkit_attached {
        return Resolution::Show(NoRuntime(NoRuntimeReason::HandleMissing));
    }

    let registry = match registry {
        Some(records) if !records.is_empty() => records,
        _ => return Resolution::Show(NoRuntime(NoRuntimeReason::RegistryEmpty)),
    };

    if inputs.source.is_empty() {
        return Resolution::Show(Cleared);
    }

    let Some(extension_id) = super::extension_id::extract(inputs.source) else {
        return Resolution::Show(Cleared);
    };

    let Some(definition) = registry.iter().find(|d| d.id == extension_id) else {
        let present: Vec<&str> = registry.iter().map(|d| d.id.as_str()).collect();
        warn!(
            searched = extension_id,
            available = ?present,
            "extension not found in block registry"
        );
        return Resolution::Show(NotLoaded);
    };

    // The empty-markup outcome is decided on the render path, after the
    // shape batch has been registered; only the no-shapes outcome short
    // circuits here.
    match toolbox::build(definition) {
        Ok(plan) => Resolution::Render(plan),
        Err(ToolboxError::NoBlocksDefined) => Resolution::Show(NoBlocksDefined),
        Err(ToolboxError::NoBlocksXml) => Resolution::Show(NoBlocksXml),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::BlockEntry;

    fn inputs<'a>(source: &'a str) -> PreviewInputs<'a> {
        PreviewInputs {
            source,
            is_loading: false,
            load_error: None,
            runtime_attached: true,
            toolkit_attached: true,
        }
    }

    fn renderable_definition(id: &str) -> BlockDefinition {
        BlockDefinition {
            id: id.into(),
            name: "Ext".into(),
            color1: "#FF0000".into(),
            color2: "#AA0000".into(),
            block_icon_uri: None,
            blocks: vec![BlockEntry {
                json: Some(serde_json::json!({"type": format!("{id}_go")})),
                xml: Some(format!("<block type=\"{id}_go\"/>")),
            }],
        }
    }

    #[test]
    fn loading_wins_over_everything() {
        let mut i = inputs("id: 'myext'");
        i.is_loading = true;
        i.load_error = Some("boom");
        i.runtime_attached = false;
        assert_eq!(resolve(&i, None), Resolution::Show(DisplayState::Loading));
    }

    #[test]
    fn load_error_precedes_handle_checks() {
        let mut i = inputs("id: 'myext'");
        i.load_error = Some("SyntaxError: unexpected token");
        i.runtime_attached = false;
        assert_eq!(
            resolve(&i, None),
            Resolution::Show(DisplayState::LoadError(
                "SyntaxError: unexpected token".into()
            ))
        );
    }

    #[test]
    fn empty_load_error_is_ignored() {
        let mut i = inputs("id: 'myext'");
        i.load_error = Some("");
        i.runtime_attached = false;
        assert_eq!(
            resolve(&i, None),
            Resolution::Show(DisplayState::NoRuntime(NoRuntimeReason::HandleMissing))
        );
    }

    #[test]
    fn missing_handles_and_empty_registry_share_a_panel() {
        let mut i = inputs("id: 'myext'");
        i.toolkit_attached = false;
        assert_eq!(
            resolve(&i, Some(&[renderable_definition("myext")])),
            Resolution::Show(DisplayState::NoRuntime(NoRuntimeReason::HandleMissing))
        );

        let i = inputs("id: 'myext'");
        assert_eq!(
            resolve(&i, Some(&[])),
            Resolution::Show(DisplayState::NoRuntime(NoRuntimeReason::RegistryEmpty))
        );
    }

    #[test]
    fn empty_or_idless_source_clears() {
        let registry = [renderable_definition("myext")];
        assert_eq!(
            resolve(&inputs(""), Some(&registry)),
            Resolution::Show(DisplayState::Cleared)
        );
        assert_eq!(
            resolve(&inputs("class Ext {}"), Some(&registry)),
            Resolution::Show(DisplayState::Cleared)
        );
    }

    #[test]
    fn unknown_id_is_not_loaded() {
        let registry = [renderable_definition("other")];
        assert_eq!(
            resolve(&inputs("id: 'myext'"), Some(&registry)),
            Resolution::Show(DisplayState::NotLoaded)
        );
    }

    #[test]
    fn record_without_shapes_is_no_blocks_defined() {
        let mut def = renderable_definition("myext");
        def.blocks = vec![BlockEntry {
            json: None,
            xml: Some("<block/>".into()),
        }];
        assert_eq!(
            resolve(&inputs("id: 'myext'"), Some(&[def])),
            Resolution::Show(DisplayState::NoBlocksDefined)
        );
    }

    #[test]
    fn shapes_without_markup_still_reach_the_render_path() {
        let mut def = renderable_definition("myext");
        def.blocks = vec![BlockEntry {
            json: Some(serde_json::json!({"type": "t"})),
            xml: None,
        }];
        match resolve(&inputs("id: 'myext'"), Some(&[def])) {
            Resolution::Render(plan) => {
                assert_eq!(plan.json_blocks.len(), 1);
                assert!(plan.require_markup().is_err());
            }
            other => panic!("expected render plan, got {other:?}"),
        }
    }

    #[test]
    fn ready_path_yields_render_plan() {
        let registry = [renderable_definition("myext")];
        match resolve(&inputs("...id: 'myext'..."), Some(&registry)) {
            Resolution::Render(plan) => {
                assert!(plan.require_markup().unwrap().contains("id=\"myext\""));
                assert_eq!(plan.json_blocks.len(), 1);
            }
            other => panic!("expected render plan, got {other:?}"),
        }
    }
}
