//! Minimal egui-drawing toolkit used by the demo binary.
//!
//! Real deployments plug a full block renderer in behind [`RenderToolkit`];
//! this one draws each palette block as a rounded pill in the category colour
//! so the Rendered state shows something tangible.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{bail, Result};
use eframe::egui;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Flyout, RenderToolkit, Workspace, WorkspaceConfig};

static CATEGORY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<category[^>]*\bname="([^"]*)""#).expect("valid name pattern"));
static CATEGORY_COLOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bcolour="([^"]*)""#).expect("valid colour pattern"));
static CATEGORY_COLOUR2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bsecondaryColour="([^"]*)""#).expect("valid colour2 pattern"));
static BLOCK_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<block\s+type="([^"]*)""#).expect("valid block pattern"));

/// Registers shapes into a shared table and paints palettes from it.
#[derive(Default)]
pub struct PaintedToolkit {
    shapes: RefCell<HashMap<String, serde_json::Value>>,
}

impl PaintedToolkit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderToolkit for PaintedToolkit {
    fn define_blocks(&self, json_blocks: &[serde_json::Value]) -> Result<()> {
        let mut shapes = self.shapes.borrow_mut();
        for descriptor in json_blocks {
            let Some(block_type) = descriptor.get("type").and_then(|t| t.as_str()) else {
                bail!("block descriptor has no \"type\" field: {descriptor}");
            };
            shapes.insert(block_type.to_string(), descriptor.clone());
        }
        Ok(())
    }

    fn inject(&self, config: &WorkspaceConfig) -> Result<Box<dyn Workspace>> {
        let toolbox = &config.toolbox;
        let name = first_capture(&CATEGORY_NAME, toolbox).unwrap_or_default();
        let colour = parse_hex(&first_capture(&CATEGORY_COLOUR, toolbox).unwrap_or_default())
            .unwrap_or(egui::Color32::from_rgb(76, 151, 255));
        let outline = parse_hex(&first_capture(&CATEGORY_COLOUR2, toolbox).unwrap_or_default())
            .unwrap_or(egui::Color32::from_rgb(51, 115, 204));

        let shapes = self.shapes.borrow();
        let mut rows = Vec::new();
        for capture in BLOCK_TYPE.captures_iter(toolbox) {
            let Some(block_type) = capture.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let Some(shape) = shapes.get(block_type) else {
                bail!("block type {block_type:?} used in toolbox but never defined");
            };
            let label = shape
                .get("message0")
                .and_then(|m| m.as_str())
                .unwrap_or(block_type)
                .to_string();
            rows.push(label);
        }

        Ok(Box::new(PaintedWorkspace {
            category: name,
            colour,
            outline,
            scale: config.zoom.start_scale,
            rows,
            flyout: PaintedFlyout::default(),
        }))
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_hex(text: &str) -> Option<egui::Color32> {
    let hex = text.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(egui::Color32::from_rgb(r, g, b))
}

#[derive(Default)]
struct PaintedFlyout {
    width: f32,
    laid_out: bool,
}

impl Flyout for PaintedFlyout {
    fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    fn reflow(&mut self) {
        self.laid_out = true;
    }
}

struct PaintedWorkspace {
    category: String,
    colour: egui::Color32,
    outline: egui::Color32,
    scale: f32,
    rows: Vec<String>,
    flyout: PaintedFlyout,
}

impl Workspace for PaintedWorkspace {
    fn flyout(&mut self) -> Option<&mut dyn Flyout> {
        Some(&mut self.flyout)
    }

    fn dispose(&mut self) {
        self.rows.clear();
    }

    fn paint(&mut self, ui: &mut egui::Ui) {
        let row_height = 40.0 * self.scale;
        let block_width = (self.flyout.width - 120.0).max(160.0) * self.scale;

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(&self.category)
                .color(egui::Color32::from_rgb(224, 224, 224))
                .size(13.0),
        );
        ui.add_space(6.0);

        for label in &self.rows {
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(block_width, row_height),
                egui::Sense::hover(),
            );
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 8.0 * self.scale, self.colour);
            painter.rect_stroke(rect, 8.0 * self.scale, egui::Stroke::new(1.5, self.outline));
            painter.text(
                rect.left_center() + egui::vec2(12.0 * self.scale, 0.0),
                egui::Align2::LEFT_CENTER,
                label,
                egui::FontId::proportional(13.0 * self.scale),
                egui::Color32::WHITE,
            );
            ui.add_space(6.0);
        }
    }
}
