//! # Tree Mutation Engine
//!
//! The [`Editor`] owns the authoritative document for one editing
//! session: the tree, the selection/hover/breakpoint cursors, the change
//! log used for save-dirty tracking, and the undo/redo stack.
//!
//! Every operation is atomic: it validates against the current tree and
//! either fully applies or leaves the document untouched, reporting the
//! rejection as a typed error. Callers never receive a live mutable
//! reference to the document, only immutable borrows.

use pagesmith_model::{
    container_backfill_styles, Breakpoint, Document, FourSide, IdGenerator, Node, NodeId,
    NodeKind, NodeStyles, Registry, StyleSheet, Tree,
};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::mutations::{Mutation, MutationError};
use crate::undo_stack::UndoStack;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("no document is loaded")]
    NoDocument,

    #[error("mutation error: {0}")]
    Mutation(#[from] MutationError),
}

/// Authoritative editing state for one document session.
pub struct Editor {
    document: Option<Document>,
    selected_node_id: Option<NodeId>,
    hovered_node_id: Option<NodeId>,
    active_breakpoint: Breakpoint,
    /// Mutations applied since the last save; non-empty means dirty.
    changes: Vec<Mutation>,
    undo_stack: UndoStack,
    ids: IdGenerator,
    registry: Registry,
}

impl Editor {
    pub fn new(page_id: &str) -> Self {
        Self {
            document: None,
            selected_node_id: None,
            hovered_node_id: None,
            active_breakpoint: Breakpoint::Desktop,
            changes: Vec::new(),
            undo_stack: UndoStack::new(),
            ids: IdGenerator::new(page_id),
            registry: Registry::builtin(),
        }
    }

    pub fn with_document(page_id: &str, document: Document) -> Self {
        let mut editor = Self::new(page_id);
        editor.load_document(document);
        editor
    }

    /// Replace the session's document; resets cursors and history.
    pub fn load_document(&mut self, document: Document) {
        self.selected_node_id = Some(document.tree.root.clone());
        self.hovered_node_id = None;
        self.active_breakpoint = Breakpoint::Desktop;
        self.changes.clear();
        self.undo_stack.clear();
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected_node_id.as_ref()
    }

    pub fn hovered_node_id(&self) -> Option<&NodeId> {
        self.hovered_node_id.as_ref()
    }

    pub fn active_breakpoint(&self) -> Breakpoint {
        self.active_breakpoint
    }

    pub fn select_node(&mut self, node_id: Option<NodeId>) {
        self.selected_node_id = node_id;
    }

    pub fn set_hovered(&mut self, node_id: Option<NodeId>) {
        self.hovered_node_id = node_id;
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.active_breakpoint = breakpoint;
    }

    /// Mutations applied since the last save.
    pub fn changes(&self) -> &[Mutation] {
        &self.changes
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn mark_saved(&mut self) {
        self.changes.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_stack.can_redo()
    }

    /// Create a node under `parent_id` and select it.
    ///
    /// Props are seeded from the manifest defaults. Declared column
    /// layouts (`layout.columns-N`) atomically create their N column
    /// children. Returns the new node's id.
    pub fn add_node(
        &mut self,
        parent_id: &str,
        component: &str,
        kind: NodeKind,
        position: Option<usize>,
    ) -> Result<NodeId, EditorError> {
        let document = self.document.as_ref().ok_or(EditorError::NoDocument)?;
        let parent = document
            .tree
            .get(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;

        if !self.registry.accepts_child(&parent.component, component) {
            return Err(MutationError::ChildNotAllowed {
                parent: parent.component.clone(),
                child: component.to_string(),
            }
            .into());
        }

        let node_id = self.ids.next_id();
        let mut node = Node::new(node_id.clone(), kind, component);
        if let Some(entry) = self.registry.resolve(component) {
            node.props = entry.default_props.clone();
        }

        // Sliders carry slides as children even though they came from the
        // media palette.
        if component == "media.slider" {
            node.kind = NodeKind::Layout;
        }

        if component == "layout.container" {
            node.styles.base = Some(container_seed_styles());
        }

        let mut bag = Vec::new();
        if let Some(count) = declared_column_count(component) {
            node.styles = NodeStyles {
                base: Some(StyleSheet {
                    display: Some("grid".to_string()),
                    gap: Some("24px".to_string()),
                    grid_template_columns: Some(format!("repeat({count}, minmax(0, 1fr))")),
                    ..Default::default()
                }),
                mobile: Some(StyleSheet {
                    grid_template_columns: Some("1fr".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            for _ in 0..count {
                let column_id = self.ids.next_id();
                let mut column = Node::new(column_id.clone(), NodeKind::Layout, "layout.column");
                column.styles.base = Some(StyleSheet {
                    display: Some("flex".to_string()),
                    flex_direction: Some("column".to_string()),
                    gap: Some("16px".to_string()),
                    ..Default::default()
                });
                node.children.push(column_id);
                bag.push(column);
            }
        }

        bag.insert(0, node);

        self.commit(Mutation::InsertSubtree {
            parent_id: parent_id.to_string(),
            index: position,
            root_id: node_id.clone(),
            nodes: bag,
        })?;

        self.selected_node_id = Some(node_id.clone());
        Ok(node_id)
    }

    /// Shallow-merge content values into a node's props.
    pub fn update_node_props(
        &mut self,
        node_id: &str,
        update: serde_json::Map<String, Value>,
    ) -> Result<(), EditorError> {
        self.commit(Mutation::MergeProps {
            node_id: node_id.to_string(),
            update,
        })
    }

    /// Shallow-merge style declarations into one breakpoint slot.
    pub fn update_node_styles(
        &mut self,
        node_id: &str,
        breakpoint: Breakpoint,
        update: StyleSheet,
    ) -> Result<(), EditorError> {
        self.commit(Mutation::MergeStyles {
            node_id: node_id.to_string(),
            breakpoint,
            update,
        })
    }

    /// Replace a parent's children with a permutation of themselves.
    pub fn reorder_children(
        &mut self,
        parent_id: &str,
        order: Vec<NodeId>,
    ) -> Result<(), EditorError> {
        self.commit(Mutation::ReorderChildren {
            parent_id: parent_id.to_string(),
            order,
        })
    }

    /// Relocate a node to a new parent/index and select it.
    pub fn move_node(
        &mut self,
        node_id: &str,
        target_parent_id: &str,
        target_index: usize,
    ) -> Result<(), EditorError> {
        let mutation = Mutation::MoveNode {
            node_id: node_id.to_string(),
            new_parent_id: target_parent_id.to_string(),
            index: target_index,
        };

        {
            let document = self.document.as_ref().ok_or(EditorError::NoDocument)?;
            // Structural guards (missing ids, root, cycles) take priority
            // over the manifest whitelist.
            mutation.validate(&document.tree)?;

            let moved = document
                .tree
                .get(node_id)
                .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
            let target = document
                .tree
                .get(target_parent_id)
                .ok_or_else(|| MutationError::ParentNotFound(target_parent_id.to_string()))?;
            if !self.registry.accepts_child(&target.component, &moved.component) {
                return Err(MutationError::ChildNotAllowed {
                    parent: target.component.clone(),
                    child: moved.component.clone(),
                }
                .into());
            }
        }

        self.commit(mutation)?;

        self.selected_node_id = Some(node_id.to_string());
        Ok(())
    }

    /// Delete a node and its whole subtree. Selection falls back to the
    /// deleted node's former parent, or the root.
    pub fn delete_node(&mut self, node_id: &str) -> Result<(), EditorError> {
        let (former_parent, root) = {
            let document = self.document.as_ref().ok_or(EditorError::NoDocument)?;
            (
                document.tree.parent_of(node_id).cloned(),
                document.tree.root.clone(),
            )
        };

        self.commit(Mutation::RemoveSubtree {
            node_id: node_id.to_string(),
        })?;

        self.selected_node_id = Some(former_parent.unwrap_or(root));
        Ok(())
    }

    /// Deep-clone a subtree with fresh ids, insert the clone right after
    /// the original, and select it.
    pub fn duplicate_node(&mut self, node_id: &str) -> Result<NodeId, EditorError> {
        let (parent_id, index, bag, clone_root) = {
            let document = self.document.as_ref().ok_or(EditorError::NoDocument)?;
            let tree = &document.tree;
            if !tree.contains(node_id) {
                return Err(MutationError::NodeNotFound(node_id.to_string()).into());
            }
            if node_id == tree.root {
                return Err(MutationError::RootImmutable.into());
            }
            let parent_id = tree
                .parent_of(node_id)
                .cloned()
                .ok_or_else(|| MutationError::ParentNotFound(node_id.to_string()))?;
            let index = tree
                .get(&parent_id)
                .and_then(|parent| parent.children.iter().position(|c| c == node_id))
                .map(|i| i + 1)
                .unwrap_or(0);

            let mut bag = Vec::new();
            let clone_root = clone_subtree(tree, node_id, &mut self.ids, &mut bag)
                .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
            (parent_id, index, bag, clone_root)
        };

        self.commit(Mutation::InsertSubtree {
            parent_id,
            index: Some(index),
            root_id: clone_root.clone(),
            nodes: bag,
        })?;

        self.selected_node_id = Some(clone_root.clone());
        Ok(clone_root)
    }

    /// Bulk-register a pre-built block subtree and append it under
    /// `parent_id`. Selects the block root.
    pub fn insert_block(
        &mut self,
        parent_id: &str,
        root_id: NodeId,
        nodes: Vec<Node>,
    ) -> Result<(), EditorError> {
        self.commit(Mutation::InsertSubtree {
            parent_id: parent_id.to_string(),
            index: None,
            root_id: root_id.clone(),
            nodes,
        })?;

        self.selected_node_id = Some(root_id);
        Ok(())
    }

    /// Undo the most recent mutation; the inverse joins the change log.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let document = self.document.as_mut().ok_or(EditorError::NoDocument)?;
        match self.undo_stack.undo(&mut document.tree)? {
            Some(applied) => {
                debug!(op = applied.name(), "undo");
                self.changes.push(applied);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Redo the most recently undone mutation.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let document = self.document.as_mut().ok_or(EditorError::NoDocument)?;
        match self.undo_stack.redo(&mut document.tree)? {
            Some(applied) => {
                debug!(op = applied.name(), "redo");
                self.changes.push(applied);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn commit(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let document = self.document.as_mut().ok_or(EditorError::NoDocument)?;
        let inverse = mutation.to_inverse(&document.tree)?;
        mutation.apply(&mut document.tree)?;
        debug!(op = mutation.name(), "applied mutation");
        self.undo_stack.record(mutation.clone(), inverse);
        self.changes.push(mutation);
        Ok(())
    }
}

/// Column count of a declared `layout.columns-N` composite, if any.
fn declared_column_count(component: &str) -> Option<usize> {
    component
        .strip_prefix("layout.columns-")
        .and_then(|suffix| suffix.parse::<usize>().ok())
        .filter(|count| *count > 0)
}

/// Styling seeded onto freshly created containers.
fn container_seed_styles() -> StyleSheet {
    StyleSheet {
        display: Some("flex".to_string()),
        flex_direction: Some("column".to_string()),
        gap: Some("20px".to_string()),
        margin: Some(FourSide::horizontal("auto", "auto")),
        padding: Some(FourSide::horizontal("24px", "24px")),
        ..container_backfill_styles()
    }
}

/// Recursive deep clone with fresh ids; returns the clone's root id and
/// pushes every cloned node into `bag`.
fn clone_subtree(
    tree: &Tree,
    source_id: &str,
    ids: &mut IdGenerator,
    bag: &mut Vec<Node>,
) -> Option<NodeId> {
    let source = tree.get(source_id)?;
    let new_id = ids.next_id();

    let mut clone = source.clone();
    clone.id = new_id.clone();
    clone.children = source
        .children
        .iter()
        .filter_map(|child| clone_subtree(tree, child, ids, bag))
        .collect();

    bag.push(clone);
    Some(new_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_column_count() {
        assert_eq!(declared_column_count("layout.columns-2"), Some(2));
        assert_eq!(declared_column_count("layout.columns-4"), Some(4));
        assert_eq!(declared_column_count("layout.column"), None);
        assert_eq!(declared_column_count("layout.columns-0"), None);
        assert_eq!(declared_column_count("content.button"), None);
    }

    #[test]
    fn test_operations_require_document() {
        let mut editor = Editor::new("page-1");
        let result = editor.delete_node("anything");
        assert_eq!(result, Err(EditorError::NoDocument));
    }
}
