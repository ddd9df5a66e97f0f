//! # Reparenting Resolver
//!
//! Translates a drag-release gesture into a validated `(parent, index)`
//! placement, or a typed rejection. The resolver only reads the document;
//! it never mutates. Callers forward the resolution to
//! [`Editor::add_node`](crate::Editor::add_node) or
//! [`Editor::move_node`](crate::Editor::move_node).
//!
//! The "active" side of a gesture is either a palette item introduced
//! for the first time or an existing node being relocated. The "over"
//! side is either a container surface or a sibling node used as a
//! relative-position marker.

use pagesmith_model::{is_layout_component, Document, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DragPayload {
    /// A fresh element from the component palette.
    Palette { component_key: String },
    /// An existing node being relocated.
    Existing { node_id: NodeId },
}

/// What the pointer was released over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DropTarget {
    /// A container surface; resolves to "append into this container".
    Container { node_id: NodeId },
    /// A sibling node; resolves to "insert before this node".
    Node { node_id: NodeId },
}

/// A validated placement, ready to hand to the mutation engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DropResolution {
    Insert {
        parent_id: NodeId,
        component_key: String,
        kind: NodeKind,
        position: Option<usize>,
    },
    Move {
        node_id: NodeId,
        parent_id: NodeId,
        index: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DropRejected {
    #[error("drop released outside any target")]
    MissingTarget,

    #[error("drop references unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("the root node cannot be dragged")]
    RootImmovable,

    #[error("a node cannot be dropped onto itself")]
    SelfDrop,

    #[error("drop would make the node its own descendant")]
    WouldCycle,
}

/// Compute a validated placement from a drag-release event.
pub fn resolve_drop(
    document: &Document,
    active: &DragPayload,
    over: Option<&DropTarget>,
) -> Result<DropResolution, DropRejected> {
    let over = over.ok_or(DropRejected::MissingTarget)?;

    match active {
        DragPayload::Palette { component_key } => resolve_palette_drop(document, component_key, over),
        DragPayload::Existing { node_id } => resolve_existing_drop(document, node_id, over),
    }
}

fn resolve_palette_drop(
    document: &Document,
    component_key: &str,
    over: &DropTarget,
) -> Result<DropResolution, DropRejected> {
    let tree = &document.tree;
    let kind = if is_layout_component(component_key) {
        NodeKind::Layout
    } else {
        NodeKind::Component
    };

    match over {
        DropTarget::Container { node_id } => {
            let container = tree
                .get(node_id)
                .ok_or_else(|| DropRejected::UnknownNode(node_id.clone()))?;
            Ok(DropResolution::Insert {
                parent_id: node_id.clone(),
                component_key: component_key.to_string(),
                kind,
                position: Some(container.children.len()),
            })
        }
        DropTarget::Node { node_id } => {
            let parent_id = tree
                .parent_of(node_id)
                .cloned()
                .ok_or(DropRejected::MissingTarget)?;
            let position = tree
                .get(&parent_id)
                .and_then(|parent| parent.children.iter().position(|child| child == node_id));
            Ok(DropResolution::Insert {
                parent_id,
                component_key: component_key.to_string(),
                kind,
                position,
            })
        }
    }
}

fn resolve_existing_drop(
    document: &Document,
    node_id: &str,
    over: &DropTarget,
) -> Result<DropResolution, DropRejected> {
    let tree = &document.tree;

    if !tree.contains(node_id) {
        return Err(DropRejected::UnknownNode(node_id.to_string()));
    }
    if tree.root == node_id {
        return Err(DropRejected::RootImmovable);
    }

    let (target_parent_id, index) = match over {
        DropTarget::Container { node_id: container_id } => {
            if container_id == node_id {
                return Err(DropRejected::SelfDrop);
            }
            let container = tree
                .get(container_id)
                .ok_or_else(|| DropRejected::UnknownNode(container_id.clone()))?;
            (container_id.clone(), container.children.len())
        }
        DropTarget::Node { node_id: over_id } => {
            if over_id == node_id {
                return Err(DropRejected::SelfDrop);
            }
            let parent_id = tree
                .parent_of(over_id)
                .cloned()
                .ok_or(DropRejected::MissingTarget)?;
            let index = tree
                .get(&parent_id)
                .map(|parent| {
                    parent
                        .children
                        .iter()
                        .position(|child| child == over_id)
                        .unwrap_or(parent.children.len())
                })
                .unwrap_or(0);
            (parent_id, index)
        }
    };

    // Walk ancestors from the proposed parent up to the root; meeting the
    // dragged node means the move would nest it inside its own subtree.
    let mut ancestor: Option<NodeId> = Some(target_parent_id.clone());
    while let Some(current) = ancestor {
        if current == node_id {
            return Err(DropRejected::WouldCycle);
        }
        ancestor = tree.parent_of(&current).cloned();
    }

    Ok(DropResolution::Move {
        node_id: node_id.to_string(),
        parent_id: target_parent_id,
        index,
    })
}
