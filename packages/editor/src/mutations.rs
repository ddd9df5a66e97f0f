//! # Tree Mutations
//!
//! Atomic structural/content operations on the document tree.
//!
//! ## Design Principles
//!
//! 1. **Validated**: every mutation checks its structural preconditions
//!    before touching the tree; a rejected mutation leaves the tree
//!    byte-for-byte unchanged.
//! 2. **Atomic**: each mutation either fully applies or not at all.
//! 3. **Invertible**: the inverse of a mutation can be computed against
//!    the pre-application tree, which is what the undo stack records.
//!
//! ## Mutation Semantics
//!
//! ### MoveNode
//! - Refuses to move the root.
//! - Rejects a move that would make a node its own descendant.
//! - Index is clamped to the destination's child count; when source and
//!   destination parent coincide and the removal shifted positions below
//!   the requested index, the index is adjusted so the node lands at the
//!   intended visual position.
//!
//! ### RemoveSubtree
//! - Refuses to delete the root.
//! - Removes the node and every descendant; no orphans survive.
//!
//! ### InsertSubtree
//! - Bulk-registers a pre-built bag of nodes (a new element, a duplicated
//!   subtree, a block template) and links its root into the parent.

use pagesmith_model::{Breakpoint, Node, NodeId, NodeStyles, StyleSheet, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structural/content operations over the document tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Register a bag of nodes and link its root under `parent_id`.
    /// `index` of `None` appends.
    InsertSubtree {
        parent_id: NodeId,
        index: Option<usize>,
        root_id: NodeId,
        nodes: Vec<Node>,
    },

    /// Shallow-merge content/configuration values into a node's props.
    MergeProps {
        node_id: NodeId,
        update: serde_json::Map<String, Value>,
    },

    /// Replace a node's props wholesale (inverse carrier for MergeProps).
    SetProps {
        node_id: NodeId,
        props: serde_json::Map<String, Value>,
    },

    /// Shallow-merge style declarations into one breakpoint slot.
    /// The desktop breakpoint maps to the `base` slot.
    MergeStyles {
        node_id: NodeId,
        breakpoint: Breakpoint,
        update: StyleSheet,
    },

    /// Replace a node's full style bag (inverse carrier for MergeStyles).
    SetStyles { node_id: NodeId, styles: NodeStyles },

    /// Replace a parent's children array with a permutation of itself.
    ReorderChildren { parent_id: NodeId, order: Vec<NodeId> },

    /// Relocate a node to a new parent at a clamped index.
    MoveNode {
        node_id: NodeId,
        new_parent_id: NodeId,
        index: usize,
    },

    /// Detach a node and delete its entire subtree.
    RemoveSubtree { node_id: NodeId },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("the root node cannot be moved, deleted or duplicated")]
    RootImmutable,

    #[error("move rejected: node would become its own descendant")]
    CycleRejected,

    #[error("node id already registered: {0}")]
    DuplicateId(NodeId),

    #[error("new child order for {0} is not a permutation of the existing children")]
    ChildSetMismatch(NodeId),

    #[error("component {child} is not an allowed child of {parent}")]
    ChildNotAllowed { parent: String, child: String },
}

impl Mutation {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertSubtree { .. } => "insert_subtree",
            Self::MergeProps { .. } => "merge_props",
            Self::SetProps { .. } => "set_props",
            Self::MergeStyles { .. } => "merge_styles",
            Self::SetStyles { .. } => "set_styles",
            Self::ReorderChildren { .. } => "reorder_children",
            Self::MoveNode { .. } => "move_node",
            Self::RemoveSubtree { .. } => "remove_subtree",
        }
    }

    /// Check preconditions without applying.
    pub fn validate(&self, tree: &Tree) -> Result<(), MutationError> {
        match self {
            Self::InsertSubtree {
                parent_id,
                root_id,
                nodes,
                ..
            } => {
                if !tree.contains(parent_id) {
                    return Err(MutationError::ParentNotFound(parent_id.clone()));
                }
                if !nodes.iter().any(|n| &n.id == root_id) {
                    return Err(MutationError::NodeNotFound(root_id.clone()));
                }
                for node in nodes {
                    if tree.contains(&node.id) {
                        return Err(MutationError::DuplicateId(node.id.clone()));
                    }
                    if nodes.iter().filter(|n| n.id == node.id).count() > 1 {
                        return Err(MutationError::DuplicateId(node.id.clone()));
                    }
                }
                Ok(())
            }

            Self::MergeProps { node_id, .. }
            | Self::SetProps { node_id, .. }
            | Self::MergeStyles { node_id, .. }
            | Self::SetStyles { node_id, .. } => {
                if !tree.contains(node_id) {
                    return Err(MutationError::NodeNotFound(node_id.clone()));
                }
                Ok(())
            }

            Self::ReorderChildren { parent_id, order } => {
                let parent = tree
                    .get(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

                let mut current: Vec<&NodeId> = parent.children.iter().collect();
                let mut proposed: Vec<&NodeId> = order.iter().collect();
                current.sort();
                proposed.sort();
                if current != proposed {
                    return Err(MutationError::ChildSetMismatch(parent_id.clone()));
                }
                Ok(())
            }

            Self::MoveNode {
                node_id,
                new_parent_id,
                ..
            } => {
                if !tree.contains(node_id) {
                    return Err(MutationError::NodeNotFound(node_id.clone()));
                }
                if node_id == &tree.root {
                    return Err(MutationError::RootImmutable);
                }
                if !tree.contains(new_parent_id) {
                    return Err(MutationError::ParentNotFound(new_parent_id.clone()));
                }
                if new_parent_id == node_id || tree.is_descendant(new_parent_id, node_id) {
                    return Err(MutationError::CycleRejected);
                }
                Ok(())
            }

            Self::RemoveSubtree { node_id } => {
                if !tree.contains(node_id) {
                    return Err(MutationError::NodeNotFound(node_id.clone()));
                }
                if node_id == &tree.root {
                    return Err(MutationError::RootImmutable);
                }
                Ok(())
            }
        }
    }

    /// Validate, then apply to the tree.
    pub fn apply(&self, tree: &mut Tree) -> Result<(), MutationError> {
        self.validate(tree)?;

        match self {
            Self::InsertSubtree {
                parent_id,
                index,
                root_id,
                nodes,
            } => {
                for node in nodes {
                    tree.nodes.insert(node.id.clone(), node.clone());
                }
                let parent = tree
                    .get_mut(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
                let position = index.unwrap_or(parent.children.len()).min(parent.children.len());
                parent.children.insert(position, root_id.clone());
                Ok(())
            }

            Self::MergeProps { node_id, update } => {
                let node = tree
                    .get_mut(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                for (key, value) in update {
                    node.props.insert(key.clone(), value.clone());
                }
                Ok(())
            }

            Self::SetProps { node_id, props } => {
                let node = tree
                    .get_mut(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                node.props = props.clone();
                Ok(())
            }

            Self::MergeStyles {
                node_id,
                breakpoint,
                update,
            } => {
                let node = tree
                    .get_mut(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                let slot = node.styles.slot_mut(*breakpoint);
                *slot = slot.overlay(update);
                Ok(())
            }

            Self::SetStyles { node_id, styles } => {
                let node = tree
                    .get_mut(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                node.styles = styles.clone();
                Ok(())
            }

            Self::ReorderChildren { parent_id, order } => {
                let parent = tree
                    .get_mut(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
                parent.children = order.clone();
                Ok(())
            }

            Self::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => Self::apply_move(tree, node_id, new_parent_id, *index),

            Self::RemoveSubtree { node_id } => {
                if let Some(parent_id) = tree.parent_of(node_id).cloned() {
                    if let Some(parent) = tree.get_mut(&parent_id) {
                        parent.children.retain(|child| child != node_id);
                    }
                }
                for id in tree.collect_subtree(node_id) {
                    tree.nodes.remove(&id);
                }
                Ok(())
            }
        }
    }

    fn apply_move(
        tree: &mut Tree,
        node_id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> Result<(), MutationError> {
        // Clamp against the destination before detaching, the way the
        // interaction layer computed the index.
        let target_len = tree
            .get(new_parent_id)
            .map(|parent| parent.children.len())
            .ok_or_else(|| MutationError::ParentNotFound(new_parent_id.to_string()))?;
        let mut insert_index = index.min(target_len);

        let current_parent_id = tree
            .parent_of(node_id)
            .cloned()
            .ok_or_else(|| MutationError::ParentNotFound(node_id.to_string()))?;

        let current_parent = tree
            .get_mut(&current_parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(current_parent_id.clone()))?;
        if let Some(current_index) = current_parent
            .children
            .iter()
            .position(|child| child == node_id)
        {
            current_parent.children.remove(current_index);
            if current_parent_id == new_parent_id && current_index < insert_index {
                insert_index -= 1;
            }
        }

        let target = tree
            .get_mut(new_parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(new_parent_id.to_string()))?;
        if !target.children.iter().any(|child| child == node_id) {
            target.children.insert(insert_index, node_id.to_string());
        }
        Ok(())
    }

    /// Compute the inverse against the pre-application tree.
    ///
    /// Validates the same preconditions as `apply`, so a mutation that
    /// would be rejected has no inverse either.
    pub fn to_inverse(&self, tree: &Tree) -> Result<Mutation, MutationError> {
        self.validate(tree)?;

        match self {
            Self::InsertSubtree { root_id, .. } => Ok(Self::RemoveSubtree {
                node_id: root_id.clone(),
            }),

            Self::MergeProps { node_id, .. } | Self::SetProps { node_id, .. } => {
                let node = tree
                    .get(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                Ok(Self::SetProps {
                    node_id: node_id.clone(),
                    props: node.props.clone(),
                })
            }

            Self::MergeStyles { node_id, .. } | Self::SetStyles { node_id, .. } => {
                let node = tree
                    .get(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                Ok(Self::SetStyles {
                    node_id: node_id.clone(),
                    styles: node.styles.clone(),
                })
            }

            Self::ReorderChildren { parent_id, .. } => {
                let parent = tree
                    .get(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
                Ok(Self::ReorderChildren {
                    parent_id: parent_id.clone(),
                    order: parent.children.clone(),
                })
            }

            Self::MoveNode { node_id, .. } => {
                let parent_id = tree
                    .parent_of(node_id)
                    .cloned()
                    .ok_or_else(|| MutationError::ParentNotFound(node_id.clone()))?;
                let index = tree
                    .get(&parent_id)
                    .and_then(|parent| {
                        parent.children.iter().position(|child| child == node_id)
                    })
                    .unwrap_or(0);
                Ok(Self::MoveNode {
                    node_id: node_id.clone(),
                    new_parent_id: parent_id,
                    index,
                })
            }

            Self::RemoveSubtree { node_id } => {
                let parent_id = tree
                    .parent_of(node_id)
                    .cloned()
                    .ok_or_else(|| MutationError::ParentNotFound(node_id.clone()))?;
                let index = tree
                    .get(&parent_id)
                    .and_then(|parent| {
                        parent.children.iter().position(|child| child == node_id)
                    })
                    .unwrap_or(0);
                let nodes = tree
                    .collect_subtree(node_id)
                    .into_iter()
                    .filter_map(|id| tree.get(&id).cloned())
                    .collect();
                Ok(Self::InsertSubtree {
                    parent_id,
                    index: Some(index),
                    root_id: node_id.clone(),
                    nodes,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_serialization_round_trip() {
        let mutation = Mutation::MoveNode {
            node_id: "a-1".to_string(),
            new_parent_id: "a-2".to_string(),
            index: 3,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let back: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(mutation, back);
    }

    #[test]
    fn test_validation_rejects_unknown_node() {
        let tree = pagesmith_model::sample_tree();
        let mutation = Mutation::MergeProps {
            node_id: "missing".to_string(),
            update: serde_json::Map::new(),
        };

        assert_eq!(
            mutation.validate(&tree),
            Err(MutationError::NodeNotFound("missing".to_string()))
        );
    }
}
