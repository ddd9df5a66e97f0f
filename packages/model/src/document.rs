//! # Document Normalization & Serialization
//!
//! A [`Document`] is the in-memory aggregate for one editing session:
//! the tree plus the attached manifest, asset references, and metadata.
//!
//! Documents are created from externally supplied tree payloads (stored
//! versions, templates, hand-authored JSON) through [`Document::from_payload`],
//! which validates minimal shape, falls back to a known-good empty tree,
//! and backfills schema drift from older producers. The inverse,
//! [`Document::serialize_tree`], emits a deep snapshot suitable for
//! transport, without cursors or manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::manifest::{ManifestEntry, Registry};
use crate::node::{Node, NodeKind, Tree};
use crate::styles::{FourSide, NodeStyles, StyleSheet};

/// Reference to an uploaded asset usable by media components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One page document: the authoritative tree plus its editing context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub tree: Tree,
    pub manifest: Vec<ManifestEntry>,
    #[serde(default)]
    pub assets: Vec<AssetRef>,
    #[serde(default)]
    pub meta: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<DateTime<Utc>>,
}

/// Tree payload format version stamped onto fresh documents.
pub const TREE_FORMAT_VERSION: &str = "2025-10-01";

/// Root id used by the built-in empty tree.
pub const SAMPLE_ROOT_ID: &str = "root";

/// The known-good empty tree: a single blank section.
pub fn sample_tree() -> Tree {
    let mut root = Node::new(SAMPLE_ROOT_ID, NodeKind::Layout, "layout.section");
    root.styles.base = Some(StyleSheet {
        background_color: Some("#ffffff".to_string()),
        min_height: Some("100%".to_string()),
        width: Some("100%".to_string()),
        ..Default::default()
    });

    let mut nodes = HashMap::new();
    nodes.insert(root.id.clone(), root);

    Tree {
        version: TREE_FORMAT_VERSION.to_string(),
        root: SAMPLE_ROOT_ID.to_string(),
        nodes,
    }
}

/// Base styling backfilled onto containers that were authored without any.
pub fn container_backfill_styles() -> StyleSheet {
    StyleSheet {
        width: Some("100%".to_string()),
        max_width: Some("1200px".to_string()),
        margin: Some(FourSide::horizontal("auto", "auto")),
        padding: Some(FourSide::horizontal("24px", "24px")),
        ..Default::default()
    }
}

fn looks_like_tree(raw: &Value) -> bool {
    raw.get("root").map(Value::is_string).unwrap_or(false)
        && raw.get("nodes").map(Value::is_object).unwrap_or(false)
}

impl Document {
    /// Normalize an externally supplied tree payload into a document.
    ///
    /// Unrecognized shapes (or payloads that fail to deserialize) fall
    /// back to the built-in empty tree rather than failing the session.
    /// The result is a deep, independent copy: it never aliases `raw`.
    pub fn from_payload(
        raw: Option<&Value>,
        meta: serde_json::Map<String, Value>,
        assets: Vec<AssetRef>,
    ) -> Self {
        let mut tree = raw
            .filter(|value| looks_like_tree(value))
            .and_then(|value| serde_json::from_value::<Tree>(value.clone()).ok())
            .unwrap_or_else(sample_tree);

        normalize_tree(&mut tree);

        Self {
            tree,
            manifest: Registry::builtin().entries().to_vec(),
            assets,
            meta,
            last_saved_at: None,
        }
    }

    /// Fresh document backed by the built-in empty tree.
    pub fn empty() -> Self {
        Self::from_payload(None, serde_json::Map::new(), Vec::new())
    }

    /// Deep snapshot of the current tree for transport/storage; cursors
    /// and manifest are not part of the snapshot.
    pub fn serialize_tree(&self) -> Tree {
        self.tree.clone()
    }

    /// Serialized tree as a JSON payload value.
    pub fn tree_payload(&self) -> Value {
        serde_json::to_value(&self.tree).unwrap_or(Value::Null)
    }
}

/// Schema backfill for legacy/incomplete payloads.
///
/// Earlier producers tagged sliders and containers as plain components,
/// and shipped containers without any authored base styling.
fn normalize_tree(tree: &mut Tree) {
    for node in tree.nodes.values_mut() {
        match node.component.as_str() {
            "media.slider" => {
                node.kind = NodeKind::Layout;
            }
            "layout.container" => {
                node.kind = NodeKind::Layout;
                if node.styles.base.is_none() {
                    node.styles = NodeStyles {
                        base: Some(container_backfill_styles()),
                        ..node.styles.clone()
                    };
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unrecognized_payload_falls_back_to_sample() {
        let doc = Document::from_payload(
            Some(&json!({ "not": "a tree" })),
            serde_json::Map::new(),
            Vec::new(),
        );

        assert_eq!(doc.tree.root, SAMPLE_ROOT_ID);
        assert_eq!(doc.tree.nodes.len(), 1);
        assert!(doc.tree.check_integrity().is_ok());
    }

    #[test]
    fn test_missing_payload_falls_back_to_sample() {
        let doc = Document::from_payload(None, serde_json::Map::new(), Vec::new());
        let root = doc.tree.get(&doc.tree.root).unwrap();
        assert_eq!(root.component, "layout.section");
        assert_eq!(
            root.styles.base.as_ref().unwrap().background_color.as_deref(),
            Some("#ffffff")
        );
    }

    #[test]
    fn test_slider_reclassified_to_layout() {
        let payload = json!({
            "version": "1",
            "root": "root",
            "nodes": {
                "root": { "id": "root", "type": "layout", "component": "layout.section", "children": ["s"] },
                "s": { "id": "s", "type": "component", "component": "media.slider", "children": [] }
            }
        });

        let doc = Document::from_payload(Some(&payload), serde_json::Map::new(), Vec::new());
        assert_eq!(doc.tree.get("s").unwrap().kind, NodeKind::Layout);
    }

    #[test]
    fn test_container_backfill_only_when_unstyled() {
        let payload = json!({
            "version": "1",
            "root": "root",
            "nodes": {
                "root": { "id": "root", "type": "layout", "component": "layout.section", "children": ["a", "b"] },
                "a": { "id": "a", "type": "component", "component": "layout.container", "children": [] },
                "b": {
                    "id": "b", "type": "layout", "component": "layout.container", "children": [],
                    "styles": { "base": { "maxWidth": "960px" } }
                }
            }
        });

        let doc = Document::from_payload(Some(&payload), serde_json::Map::new(), Vec::new());

        let backfilled = doc.tree.get("a").unwrap();
        assert_eq!(backfilled.kind, NodeKind::Layout);
        let base = backfilled.styles.base.as_ref().unwrap();
        assert_eq!(base.max_width.as_deref(), Some("1200px"));
        assert_eq!(base.margin.as_ref().unwrap().to_shorthand(), "0 auto 0 auto");

        // Authored styling is left alone.
        let authored = doc.tree.get("b").unwrap();
        assert_eq!(
            authored.styles.base.as_ref().unwrap().max_width.as_deref(),
            Some("960px")
        );
    }

    #[test]
    fn test_normalized_document_is_independent_copy() {
        let mut payload = json!({
            "version": "1",
            "root": "root",
            "nodes": {
                "root": { "id": "root", "type": "layout", "component": "layout.section", "children": [] }
            }
        });

        let doc = Document::from_payload(Some(&payload), serde_json::Map::new(), Vec::new());
        payload["nodes"]["root"]["component"] = json!("layout.row");

        assert_eq!(doc.tree.get("root").unwrap().component, "layout.section");
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let payload = json!({
            "version": "2",
            "root": "root",
            "nodes": {
                "root": { "id": "root", "type": "layout", "component": "layout.section", "children": ["t"] },
                "t": {
                    "id": "t", "type": "component", "component": "content.richText",
                    "props": { "text": "Hello", "tag": "p" }, "children": [],
                    "styles": { "base": { "fontSize": "18px" }, "mobile": { "fontSize": "14px" } }
                }
            }
        });

        let doc = Document::from_payload(Some(&payload), serde_json::Map::new(), Vec::new());
        let snapshot = doc.tree_payload();
        let restored = Document::from_payload(Some(&snapshot), serde_json::Map::new(), Vec::new());

        assert_eq!(restored.tree, doc.tree);
    }
}
