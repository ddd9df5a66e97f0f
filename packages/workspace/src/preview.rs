//! # Preview Channel
//!
//! Keyed, size-bounded, best-effort local snapshot store. The builder
//! writes a snapshot on every document change; a separate preview
//! surface reads it back by page id and renders at a requested
//! breakpoint. An oversized snapshot is dropped rather than failing the
//! editing session, mirroring a quota-limited local store.

use std::collections::HashMap;

use pagesmith_evaluator::render_document_css;
use pagesmith_model::{AssetRef, Breakpoint, Document, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const PREVIEW_KEY_PREFIX: &str = "pagesmith:preview:";

/// Per-snapshot byte budget, roughly a local-storage quota share.
pub const DEFAULT_SNAPSHOT_BUDGET: usize = 2 * 1024 * 1024;

/// What the preview surface needs to render: tree + metadata + assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSnapshot {
    pub tree: Tree,
    #[serde(default)]
    pub meta: serde_json::Map<String, Value>,
    #[serde(default)]
    pub assets: Vec<AssetRef>,
}

/// Read-side address: which page, at which breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRequest {
    pub page_id: String,
    pub breakpoint: Breakpoint,
}

/// A snapshot resolved for one preview request.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub snapshot: PreviewSnapshot,
    pub breakpoint: Breakpoint,
}

impl PreviewView {
    /// Stylesheet for the snapshot; media queries cover every breakpoint,
    /// so the requested one just selects the viewport the surface opens at.
    pub fn render_css(&self) -> String {
        let document = Document {
            tree: self.snapshot.tree.clone(),
            manifest: Vec::new(),
            assets: self.snapshot.assets.clone(),
            meta: self.snapshot.meta.clone(),
            last_saved_at: None,
        };
        render_document_css(&document)
    }
}

pub fn preview_key(page_id: &str) -> String {
    format!("{PREVIEW_KEY_PREFIX}{page_id}")
}

/// In-memory keyed snapshot store with a per-entry byte budget.
#[derive(Debug)]
pub struct PreviewChannel {
    entries: HashMap<String, String>,
    snapshot_budget: usize,
}

impl PreviewChannel {
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_SNAPSHOT_BUDGET)
    }

    pub fn with_budget(snapshot_budget: usize) -> Self {
        Self {
            entries: HashMap::new(),
            snapshot_budget,
        }
    }

    /// Write the document's snapshot. Best-effort: an unserializable or
    /// oversized snapshot is dropped and reported by the return value.
    pub fn write(&mut self, page_id: &str, document: &Document) -> bool {
        let snapshot = PreviewSnapshot {
            tree: document.serialize_tree(),
            meta: document.meta.clone(),
            assets: document.assets.clone(),
        };

        let serialized = match serde_json::to_string(&snapshot) {
            Ok(serialized) => serialized,
            Err(error) => {
                warn!(page = page_id, %error, "failed to serialize preview snapshot");
                return false;
            }
        };

        if serialized.len() > self.snapshot_budget {
            warn!(
                page = page_id,
                size = serialized.len(),
                budget = self.snapshot_budget,
                "preview snapshot over budget, dropped"
            );
            return false;
        }

        self.entries.insert(preview_key(page_id), serialized);
        true
    }

    pub fn read(&self, page_id: &str) -> Option<PreviewSnapshot> {
        let serialized = self.entries.get(&preview_key(page_id))?;
        serde_json::from_str(serialized).ok()
    }

    /// Resolve a preview request; the breakpoint travels with the view
    /// so the surface can resolve styles for it.
    pub fn load(&self, request: &PreviewRequest) -> Option<PreviewView> {
        Some(PreviewView {
            snapshot: self.read(&request.page_id)?,
            breakpoint: request.breakpoint,
        })
    }

    pub fn remove(&mut self, page_id: &str) {
        self.entries.remove(&preview_key(page_id));
    }
}

impl Default for PreviewChannel {
    fn default() -> Self {
        Self::new()
    }
}
