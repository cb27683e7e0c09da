//! Block registry model and the runtime handle the preview reads from.
//!
//! The runtime owns the registry: the preview only ever takes a snapshot at
//! render time and subscribes to the registry-updated notification to learn
//! about asynchronous changes.  [`InMemoryRuntime`] is the host-session
//! implementation used by the demo binary and the tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preview::extension_id;

// ─── Registry records ─────────────────────────────────────────────────────────

/// One palette entry of a compiled extension.
///
/// `json` is the opaque block-shape descriptor handed to the rendering
/// toolkit's registrar; `xml` is that block's toolbox markup fragment.
/// Either may be absent for reporter-only or hidden blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockEntry {
    pub json: Option<serde_json::Value>,
    pub xml: Option<String>,
}

/// Compiled metadata for one extension, keyed by its declared id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub id: String,
    pub name: String,
    pub color1: String,
    pub color2: String,
    pub block_icon_uri: Option<String>,
    pub blocks: Vec<BlockEntry>,
}

// ─── Runtime handle ───────────────────────────────────────────────────────────

/// Token returned by [`RuntimeHandle::on_registry_update`]; pass it back to
/// [`RuntimeHandle::remove_listener`] to detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// The live execution environment for user-authored extensions, as seen by
/// the preview: a readable registry plus a registry-updated notification.
pub trait RuntimeHandle {
    /// Snapshot of the block registry at this instant.  Callers must not
    /// cache the returned records across renders.
    fn block_registry(&self) -> Vec<BlockDefinition>;

    /// Register a listener fired after every registry mutation.
    fn on_registry_update(&self, listener: Box<dyn Fn()>) -> SubscriptionId;

    /// Detach a previously registered listener.  Unknown ids are ignored.
    fn remove_listener(&self, id: SubscriptionId);
}

// ─── In-memory runtime ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no extension id declared (expected id: '...')")]
    MissingId,
    #[error("extension source is empty")]
    EmptySource,
}

/// Host-session runtime backed by plain in-memory storage.
///
/// `load_extension` is a stand-in for the real compile step: it scans the
/// source's `getInfo()`-style literal for the declared id, name, colours and
/// opcodes, and publishes the resulting [`BlockDefinition`].
#[derive(Default)]
pub struct InMemoryRuntime {
    registry: RefCell<Vec<BlockDefinition>>,
    listeners: RefCell<Vec<(SubscriptionId, Box<dyn Fn()>)>>,
    next_listener: Cell<u64>,
}

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name:\s*['"]([^'"]+)['"]"#).expect("valid name pattern"));
static COLOR1_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"color1:\s*['"]([^'"]+)['"]"#).expect("valid color1 pattern"));
static COLOR2_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"color2:\s*['"]([^'"]+)['"]"#).expect("valid color2 pattern"));
static OPCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"opcode:\s*['"]([^'"]+)['"]"#).expect("valid opcode pattern"));
static TEXT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"text:\s*['"]([^'"]+)['"]"#).expect("valid text pattern"));

impl InMemoryRuntime {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Replace (or insert) a definition and fire the registry-updated
    /// notification.
    pub fn upsert_definition(&self, def: BlockDefinition) {
        {
            let mut registry = self.registry.borrow_mut();
            if let Some(existing) = registry.iter_mut().find(|d| d.id == def.id) {
                *existing = def;
            } else {
                registry.push(def);
            }
        }
        self.notify();
    }

    /// Drop every definition and fire the registry-updated notification.
    pub fn clear(&self) {
        self.registry.borrow_mut().clear();
        self.notify();
    }

    /// Compile `source` into a [`BlockDefinition`] and publish it.
    ///
    /// Scans the declared metadata fields the same way the editor's id
    /// extractor does; each `opcode:` declaration becomes one palette entry
    /// whose label is the following `text:` declaration when present.
    pub fn load_extension(&self, source: &str) -> Result<(), LoadError> {
        if source.trim().is_empty() {
            return Err(LoadError::EmptySource);
        }
        let id = extension_id::extract(source)
            .ok_or(LoadError::MissingId)?
            .to_string();

        let name = NAME_PATTERN
            .captures(source)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| id.clone());
        let color1 = COLOR1_PATTERN
            .captures(source)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "#4C97FF".to_string());
        let color2 = COLOR2_PATTERN
            .captures(source)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "#3373CC".to_string());

        let texts: Vec<&str> = TEXT_PATTERN
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();

        let blocks = OPCODE_PATTERN
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .enumerate()
            .map(|(i, m)| {
                let opcode = m.as_str();
                let block_type = format!("{id}_{opcode}");
                let label = texts.get(i).copied().unwrap_or(opcode);
                BlockEntry {
                    json: Some(serde_json::json!({
                        "type": block_type,
                        "message0": label,
                    })),
                    xml: Some(format!("<block type=\"{block_type}\"/>")),
                }
            })
            .collect();

        self.upsert_definition(BlockDefinition {
            id,
            name,
            color1,
            color2,
            block_icon_uri: None,
            blocks,
        });
        Ok(())
    }

    /// Number of currently attached registry listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        // Listeners must not subscribe/unsubscribe from inside the callback;
        // they only flip dirty flags, so holding the borrow across the calls
        // is fine.
        for (_, listener) in self.listeners.borrow().iter() {
            listener();
        }
    }
}

impl RuntimeHandle for InMemoryRuntime {
    fn block_registry(&self) -> Vec<BlockDefinition> {
        self.registry.borrow().clone()
    }

    fn on_registry_update(&self, listener: Box<dyn Fn()>) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener.get());
        self.next_listener.set(self.next_listener.get() + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}
