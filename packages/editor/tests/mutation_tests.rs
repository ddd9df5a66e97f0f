//! Mutation-level semantics: validation, atomicity, index handling,
//! inverse generation.

use pagesmith_editor::{Mutation, MutationError};
use pagesmith_model::{Breakpoint, Node, NodeKind, StyleSheet, Tree};
use serde_json::json;

fn fixture() -> Tree {
    serde_json::from_value(json!({
        "version": "1",
        "root": "root",
        "nodes": {
            "root": { "id": "root", "type": "layout", "component": "layout.section", "children": ["row", "tail"] },
            "row": { "id": "row", "type": "layout", "component": "layout.row", "children": ["a", "b", "c"] },
            "a": { "id": "a", "type": "component", "component": "content.button", "children": [] },
            "b": { "id": "b", "type": "component", "component": "content.richText", "children": [] },
            "c": { "id": "c", "type": "component", "component": "content.image", "children": [] },
            "tail": { "id": "tail", "type": "layout", "component": "layout.row", "children": [] }
        }
    }))
    .unwrap()
}

fn children(tree: &Tree, id: &str) -> Vec<String> {
    tree.get(id).unwrap().children.clone()
}

#[test]
fn test_move_to_other_parent() {
    let mut tree = fixture();

    Mutation::MoveNode {
        node_id: "b".to_string(),
        new_parent_id: "tail".to_string(),
        index: 0,
    }
    .apply(&mut tree)
    .unwrap();

    assert_eq!(children(&tree, "row"), vec!["a", "c"]);
    assert_eq!(children(&tree, "tail"), vec!["b"]);
    assert!(tree.check_integrity().is_ok());
}

#[test]
fn test_move_index_clamped() {
    let mut tree = fixture();

    Mutation::MoveNode {
        node_id: "a".to_string(),
        new_parent_id: "tail".to_string(),
        index: 99,
    }
    .apply(&mut tree)
    .unwrap();

    assert_eq!(children(&tree, "tail"), vec!["a"]);
}

#[test]
fn test_same_parent_move_adjusts_for_removal() {
    let mut tree = fixture();

    // Moving "a" (index 0) to the end of the same parent: the removal
    // shifts the remaining children down, so the index is adjusted and
    // "a" lands at the intended visual position, after "c".
    Mutation::MoveNode {
        node_id: "a".to_string(),
        new_parent_id: "row".to_string(),
        index: 3,
    }
    .apply(&mut tree)
    .unwrap();

    assert_eq!(children(&tree, "row"), vec!["b", "c", "a"]);
}

#[test]
fn test_move_rejects_root() {
    let mut tree = fixture();
    let before = tree.clone();

    let result = Mutation::MoveNode {
        node_id: "root".to_string(),
        new_parent_id: "row".to_string(),
        index: 0,
    }
    .apply(&mut tree);

    assert_eq!(result, Err(MutationError::RootImmutable));
    assert_eq!(tree, before);
}

#[test]
fn test_move_rejects_self_parent() {
    let mut tree = fixture();
    let before = tree.clone();

    let result = Mutation::MoveNode {
        node_id: "row".to_string(),
        new_parent_id: "row".to_string(),
        index: 0,
    }
    .apply(&mut tree);

    assert_eq!(result, Err(MutationError::CycleRejected));
    assert_eq!(tree, before);
}

#[test]
fn test_move_rejects_descent_into_own_subtree() {
    let mut tree = fixture();
    let before = tree.clone();

    // "a" is a child of "row"; moving "row" under "a" would create a cycle.
    let result = Mutation::MoveNode {
        node_id: "row".to_string(),
        new_parent_id: "a".to_string(),
        index: 0,
    }
    .apply(&mut tree);

    assert_eq!(result, Err(MutationError::CycleRejected));
    assert_eq!(tree, before, "rejected move must leave the tree unchanged");
}

#[test]
fn test_remove_subtree_is_transitive() {
    let mut tree = fixture();

    Mutation::RemoveSubtree {
        node_id: "row".to_string(),
    }
    .apply(&mut tree)
    .unwrap();

    for id in ["row", "a", "b", "c"] {
        assert!(!tree.contains(id), "{id} should be gone");
    }
    assert_eq!(children(&tree, "root"), vec!["tail"]);
    assert!(tree.check_integrity().is_ok());
}

#[test]
fn test_remove_rejects_root() {
    let mut tree = fixture();
    let result = Mutation::RemoveSubtree {
        node_id: "root".to_string(),
    }
    .apply(&mut tree);

    assert_eq!(result, Err(MutationError::RootImmutable));
    assert!(tree.contains("root"));
}

#[test]
fn test_reorder_accepts_permutation() {
    let mut tree = fixture();

    Mutation::ReorderChildren {
        parent_id: "row".to_string(),
        order: vec!["c".to_string(), "a".to_string(), "b".to_string()],
    }
    .apply(&mut tree)
    .unwrap();

    assert_eq!(children(&tree, "row"), vec!["c", "a", "b"]);
}

#[test]
fn test_reorder_rejects_non_permutation() {
    let mut tree = fixture();
    let before = tree.clone();

    let dropped_one = Mutation::ReorderChildren {
        parent_id: "row".to_string(),
        order: vec!["a".to_string(), "b".to_string()],
    }
    .apply(&mut tree);
    assert_eq!(
        dropped_one,
        Err(MutationError::ChildSetMismatch("row".to_string()))
    );

    let foreign = Mutation::ReorderChildren {
        parent_id: "row".to_string(),
        order: vec!["a".to_string(), "b".to_string(), "tail".to_string()],
    }
    .apply(&mut tree);
    assert_eq!(
        foreign,
        Err(MutationError::ChildSetMismatch("row".to_string()))
    );

    assert_eq!(tree, before);
}

#[test]
fn test_insert_subtree_rejects_registered_id() {
    let mut tree = fixture();
    let before = tree.clone();

    let result = Mutation::InsertSubtree {
        parent_id: "root".to_string(),
        index: None,
        root_id: "a".to_string(),
        nodes: vec![Node::new("a", NodeKind::Component, "content.button")],
    }
    .apply(&mut tree);

    assert_eq!(result, Err(MutationError::DuplicateId("a".to_string())));
    assert_eq!(tree, before);
}

#[test]
fn test_insert_subtree_links_at_index() {
    let mut tree = fixture();

    Mutation::InsertSubtree {
        parent_id: "root".to_string(),
        index: Some(1),
        root_id: "x".to_string(),
        nodes: vec![Node::new("x", NodeKind::Layout, "layout.row")],
    }
    .apply(&mut tree)
    .unwrap();

    assert_eq!(children(&tree, "root"), vec!["row", "x", "tail"]);
}

#[test]
fn test_merge_styles_desktop_lands_in_base() {
    let mut tree = fixture();

    Mutation::MergeStyles {
        node_id: "a".to_string(),
        breakpoint: Breakpoint::Desktop,
        update: StyleSheet {
            color: Some("#dc2626".to_string()),
            ..Default::default()
        },
    }
    .apply(&mut tree)
    .unwrap();

    let styles = &tree.get("a").unwrap().styles;
    assert_eq!(
        styles.base.as_ref().unwrap().color.as_deref(),
        Some("#dc2626")
    );
    assert!(styles.mobile.is_none());
}

#[test]
fn test_merge_props_preserves_untouched_keys() {
    let mut tree = fixture();

    Mutation::MergeProps {
        node_id: "b".to_string(),
        update: json!({ "text": "Hello" }).as_object().cloned().unwrap(),
    }
    .apply(&mut tree)
    .unwrap();

    Mutation::MergeProps {
        node_id: "b".to_string(),
        update: json!({ "tag": "h2" }).as_object().cloned().unwrap(),
    }
    .apply(&mut tree)
    .unwrap();

    let props = &tree.get("b").unwrap().props;
    assert_eq!(props["text"], "Hello");
    assert_eq!(props["tag"], "h2");
}

#[test]
fn test_move_inverse_restores_original_position() {
    let mut tree = fixture();
    let before = tree.clone();

    let mutation = Mutation::MoveNode {
        node_id: "b".to_string(),
        new_parent_id: "tail".to_string(),
        index: 0,
    };
    let inverse = mutation.to_inverse(&tree).unwrap();
    mutation.apply(&mut tree).unwrap();
    inverse.apply(&mut tree).unwrap();

    assert_eq!(tree, before);
}

#[test]
fn test_remove_inverse_restores_subtree_verbatim() {
    let mut tree = fixture();
    let before = tree.clone();

    let mutation = Mutation::RemoveSubtree {
        node_id: "row".to_string(),
    };
    let inverse = mutation.to_inverse(&tree).unwrap();
    mutation.apply(&mut tree).unwrap();
    assert!(!tree.contains("row"));

    inverse.apply(&mut tree).unwrap();
    assert_eq!(tree, before);
}

#[test]
fn test_rejected_mutation_has_no_inverse() {
    let tree = fixture();
    let result = Mutation::RemoveSubtree {
        node_id: "root".to_string(),
    }
    .to_inverse(&tree);

    assert_eq!(result, Err(MutationError::RootImmutable));
}
