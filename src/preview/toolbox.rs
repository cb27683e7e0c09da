//! Builds the toolbox descriptor for one block definition.
//!
//! The write direction of the preview pipeline: `BlockDefinition → shape
//! batch + toolbox markup`.  The builder is pure and staged: the shape batch
//! comes out first so the component can register it with the toolkit, and
//! only then is the markup stage checked — a record with shapes but no
//! markup still reaches the registrar.

use thiserror::Error;

use crate::runtime::BlockDefinition;

/// Terminal builder outcomes.  Each maps to its own display state; neither is
/// a render failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToolboxError {
    /// No palette entry carries a `json` shape descriptor.
    #[error("no blocks defined")]
    NoBlocksDefined,
    /// Shapes exist but no entry contributes toolbox markup.
    #[error("no blocks xml")]
    NoBlocksXml,
}

/// Everything needed to materialize a preview workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolboxPlan {
    /// Shape descriptors in palette order, registered as one batch before
    /// the markup stage is consulted.
    pub json_blocks: Vec<serde_json::Value>,
    /// The category markup wrapping every entry's xml fragment, or `None`
    /// when no entry contributes any.
    toolbox_xml: Option<String>,
}

impl ToolboxPlan {
    /// The category markup, or [`ToolboxError::NoBlocksXml`] when the record
    /// has shapes but nothing to show.
    pub fn require_markup(&self) -> Result<&str, ToolboxError> {
        self.toolbox_xml.as_deref().ok_or(ToolboxError::NoBlocksXml)
    }
}

/// Build the toolbox plan for `def`, rebuilt fresh on every render pass.
///
/// Fails only when no entry defines a shape; the empty-markup case is left
/// inside the plan so callers can register the batch first.
pub fn build(def: &BlockDefinition) -> Result<ToolboxPlan, ToolboxError> {
    let json_blocks: Vec<serde_json::Value> =
        def.blocks.iter().filter_map(|b| b.json.clone()).collect();
    if json_blocks.is_empty() {
        return Err(ToolboxError::NoBlocksDefined);
    }

    let blocks_xml: String = def
        .blocks
        .iter()
        .filter_map(|b| b.xml.as_deref())
        .collect();
    if blocks_xml.is_empty() {
        return Ok(ToolboxPlan {
            json_blocks,
            toolbox_xml: None,
        });
    }

    // Attribute order and the space before the icon slot are part of the
    // markup contract with the toolkit.
    let icon = def
        .block_icon_uri
        .as_deref()
        .map(|uri| format!("iconURI=\"{uri}\""))
        .unwrap_or_default();
    let toolbox_xml = format!(
        "<xml><category name=\"{}\" id=\"{}\" colour=\"{}\" secondaryColour=\"{}\" {}>{}</category></xml>",
        def.name, def.id, def.color1, def.color2, icon, blocks_xml
    );

    Ok(ToolboxPlan {
        json_blocks,
        toolbox_xml: Some(toolbox_xml),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::BlockEntry;

    fn definition(blocks: Vec<BlockEntry>) -> BlockDefinition {
        BlockDefinition {
            id: "myext".into(),
            name: "My Ext".into(),
            color1: "#FF0000".into(),
            color2: "#AA0000".into(),
            block_icon_uri: None,
            blocks,
        }
    }

    #[test]
    fn builds_exact_category_markup() {
        let def = definition(vec![BlockEntry {
            json: Some(serde_json::json!({"type": "myext_hello"})),
            xml: Some("<block .../>".into()),
        }]);
        let plan = build(&def).unwrap();
        assert_eq!(
            plan.require_markup().unwrap(),
            "<xml><category name=\"My Ext\" id=\"myext\" colour=\"#FF0000\" \
             secondaryColour=\"#AA0000\" ><block .../></category></xml>"
        );
        assert_eq!(plan.json_blocks.len(), 1);
    }

    #[test]
    fn icon_attribute_present_only_when_set() {
        let mut def = definition(vec![BlockEntry {
            json: Some(serde_json::json!({})),
            xml: Some("<block/>".into()),
        }]);
        def.block_icon_uri = Some("data:image/png;base64,AAA".into());
        let plan = build(&def).unwrap();
        assert!(plan
            .require_markup()
            .unwrap()
            .contains(" iconURI=\"data:image/png;base64,AAA\">"));

        def.block_icon_uri = None;
        let plan = build(&def).unwrap();
        let markup = plan.require_markup().unwrap();
        assert!(!markup.contains("iconURI"));
        assert!(markup.contains("secondaryColour=\"#AA0000\" >"));
    }

    #[test]
    fn no_json_entries_is_no_blocks_defined() {
        let def = definition(vec![
            BlockEntry {
                json: None,
                xml: Some("<block/>".into()),
            },
            BlockEntry::default(),
        ]);
        assert_eq!(build(&def), Err(ToolboxError::NoBlocksDefined));
    }

    #[test]
    fn json_without_xml_still_yields_the_shape_batch() {
        let def = definition(vec![BlockEntry {
            json: Some(serde_json::json!({"type": "t"})),
            xml: None,
        }]);
        let plan = build(&def).unwrap();
        assert_eq!(plan.json_blocks.len(), 1);
        assert_eq!(plan.require_markup(), Err(ToolboxError::NoBlocksXml));
    }

    #[test]
    fn preserves_palette_order() {
        let def = definition(vec![
            BlockEntry {
                json: Some(serde_json::json!({"type": "a"})),
                xml: Some("<block type=\"a\"/>".into()),
            },
            BlockEntry {
                json: None,
                xml: Some("<block type=\"skip\"/>".into()),
            },
            BlockEntry {
                json: Some(serde_json::json!({"type": "b"})),
                xml: Some("<block type=\"b\"/>".into()),
            },
        ]);
        let plan = build(&def).unwrap();
        assert_eq!(plan.json_blocks[0]["type"], "a");
        assert_eq!(plan.json_blocks[1]["type"], "b");
        let markup = plan.require_markup().unwrap();
        let a = markup.find("type=\"a\"").unwrap();
        let skip = markup.find("type=\"skip\"").unwrap();
        let b = markup.find("type=\"b\"").unwrap();
        assert!(a < skip && skip < b);
    }
}
