//! # Document Tree
//!
//! The node arena backing one page document: a rooted, ordered tree of
//! layout containers and content components.
//!
//! Nodes are stored in an id-keyed map; edges are ordered child-id vectors.
//! Parent links are not stored; they are derived by scanning children
//! arrays, which is cheap at the document sizes involved (hundreds of
//! nodes).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::styles::NodeStyles;

/// Opaque node identifier, unique within a tree.
pub type NodeId = String;

/// Structural role of a node.
///
/// Layout nodes arrange children and act as drop containers. Component
/// nodes are leaf-like: a few (e.g. an image slider) still carry children,
/// but they are not general drop targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Layout,
    Component,
}

/// Single element in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Component key resolved against the manifest (e.g. `content.button`).
    pub component: String,

    /// Content/configuration values specific to `component`.
    #[serde(default)]
    pub props: serde_json::Map<String, Value>,

    /// Ordered child ids; order is document order.
    #[serde(default)]
    pub children: Vec<NodeId>,

    #[serde(default, skip_serializing_if = "NodeStyles::is_empty")]
    pub styles: NodeStyles,

    /// Opaque extension data, untouched by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<serde_json::Map<String, Value>>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, component: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            component: component.into(),
            props: serde_json::Map::new(),
            children: Vec::new(),
            styles: NodeStyles::default(),
            metadata: None,
            bindings: None,
        }
    }

    pub fn is_layout(&self) -> bool {
        self.kind == NodeKind::Layout
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Structural invariant violations reported by [`Tree::check_integrity`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("root node {0} missing from node map")]
    MissingRoot(NodeId),

    #[error("child {child} referenced by {parent} is missing")]
    MissingChild { parent: NodeId, child: NodeId },

    #[error("node {0} is referenced by more than one parent")]
    MultipleParents(NodeId),

    #[error("node {0} appears as its own descendant")]
    Cycle(NodeId),

    #[error("node {0} is not reachable from the root")]
    Orphaned(NodeId),
}

/// The rooted, ordered, acyclic structure composing one document version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub version: String,
    pub root: NodeId,
    pub nodes: HashMap<NodeId, Node>,
}

impl Tree {
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Derive a node's parent by scanning children arrays.
    pub fn parent_of(&self, id: &str) -> Option<&NodeId> {
        self.nodes
            .values()
            .find(|node| node.children.iter().any(|child| child == id))
            .map(|node| &node.id)
    }

    /// True when `id` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, id: &str, ancestor: &str) -> bool {
        let mut cursor = self.parent_of(id);
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = self.parent_of(parent);
        }
        false
    }

    /// Preorder ids of the subtree rooted at `id` (including `id` itself).
    pub fn collect_subtree(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                for child in node.children.iter().rev() {
                    stack.push(child.clone());
                }
            }
            out.push(current);
        }
        out
    }

    /// Verify the single-owner, acyclic, no-orphan invariants.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        if !self.nodes.contains_key(&self.root) {
            return Err(IntegrityError::MissingRoot(self.root.clone()));
        }

        // Every non-root id must be referenced by exactly one parent.
        let mut referenced: HashSet<&NodeId> = HashSet::new();
        for node in self.nodes.values() {
            for child in &node.children {
                if !self.nodes.contains_key(child) {
                    return Err(IntegrityError::MissingChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                if !referenced.insert(child) {
                    return Err(IntegrityError::MultipleParents(child.clone()));
                }
            }
        }

        // Walk down from the root; a revisit is a cycle, anything left over
        // afterwards is orphaned.
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut stack = vec![&self.root];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                return Err(IntegrityError::Cycle(current.clone()));
            }
            if let Some(node) = self.nodes.get(current) {
                for child in &node.children {
                    stack.push(child);
                }
            }
        }
        for id in self.nodes.keys() {
            if !visited.contains(id) {
                return Err(IntegrityError::Orphaned(id.clone()));
            }
        }

        Ok(())
    }
}
