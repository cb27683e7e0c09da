use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::runtime::InMemoryRuntime;
use crate::toolkit::PaintedToolkit;

const SAMPLE_EXTENSION: &str = r#"class HelloBlocks {
    getInfo() {
        return {
            id: 'hello',
            name: 'Hello Blocks',
            color1: '#9966FF',
            color2: '#774DCB',
            blocks: [
                { opcode: 'greet', blockType: 'command', text: 'greet [NAME]' },
                { opcode: 'waveCount', blockType: 'reporter', text: 'wave count' }
            ]
        };
    }
}
"#;

/// Host-owned editor state: the source text, the transient load flags and
/// the session handles.  Direct-mapped form state, no logic beyond the
/// run-extension flow.
#[derive(Serialize, Deserialize)]
pub struct EditorState {
    pub source: String,
    pub active_tab: String,

    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub load_error: Option<String>,
    #[serde(skip)]
    pub pending_run: bool,

    #[serde(skip)]
    pub runtime: Option<Rc<InMemoryRuntime>>,
    #[serde(skip)]
    pub toolkit: Option<Rc<PaintedToolkit>>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            source: SAMPLE_EXTENSION.to_string(),
            active_tab: "code".to_string(),
            is_loading: false,
            load_error: None,
            pending_run: false,
            runtime: Some(InMemoryRuntime::new()),
            toolkit: Some(Rc::new(PaintedToolkit::new())),
        }
    }
}

impl EditorState {
    /// Queue a compile of the current source.  The actual load runs on the
    /// next frame so the Loading panel gets at least one paint.
    pub fn request_run(&mut self) {
        self.is_loading = true;
        self.load_error = None;
        self.pending_run = true;
    }

    /// Drain a queued run.  Returns `true` when a load was executed.
    pub fn tick(&mut self) -> bool {
        if !self.pending_run {
            return false;
        }
        self.pending_run = false;
        if let Some(runtime) = &self.runtime {
            if let Err(err) = runtime.load_extension(&self.source) {
                self.load_error = Some(err.to_string());
            }
        }
        self.is_loading = false;
        true
    }
}
