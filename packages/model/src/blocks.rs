//! # Block Templates
//!
//! Pre-built multi-node subtrees inserted as a unit (a ready-made hero,
//! a call-to-action strip). Every instantiation mints fresh ids from the
//! session's generator, so a block can be inserted repeatedly without
//! collisions.

use serde_json::json;

use crate::id_generator::IdGenerator;
use crate::node::{Node, NodeId, NodeKind};
use crate::styles::{FourSide, NodeStyles, StyleSheet};

/// A freshly instantiated block subtree, ready for bulk insertion.
#[derive(Debug, Clone)]
pub struct BlockDefinition {
    pub root_id: NodeId,
    pub nodes: Vec<Node>,
}

/// Catalog entry for one insertable block.
#[derive(Debug, Clone)]
pub struct BlockTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    create: fn(&mut IdGenerator) -> BlockDefinition,
}

impl BlockTemplate {
    pub fn create(&self, ids: &mut IdGenerator) -> BlockDefinition {
        (self.create)(ids)
    }
}

pub fn builtin_blocks() -> Vec<BlockTemplate> {
    vec![
        BlockTemplate {
            id: "hero",
            name: "Hero",
            description: "Headline, supporting copy and two call-to-action buttons",
            create: create_hero_block,
        },
        BlockTemplate {
            id: "cta",
            name: "Call to action",
            description: "Centered prompt with a single button",
            create: create_cta_block,
        },
        BlockTemplate {
            id: "feature-columns",
            name: "Feature columns",
            description: "Three statistics side by side",
            create: create_feature_columns_block,
        },
    ]
}

fn text_node(ids: &mut IdGenerator, text: &str, tag: &str) -> Node {
    let mut node = Node::new(ids.next_id(), NodeKind::Component, "content.richText");
    node.props = json!({ "text": text, "tag": tag })
        .as_object()
        .cloned()
        .unwrap_or_default();
    node
}

fn button_node(ids: &mut IdGenerator, label: &str, variant: &str) -> Node {
    let mut node = Node::new(ids.next_id(), NodeKind::Component, "content.button");
    node.props = json!({ "label": label, "href": "#", "variant": variant })
        .as_object()
        .cloned()
        .unwrap_or_default();
    node
}

fn create_hero_block(ids: &mut IdGenerator) -> BlockDefinition {
    let mut section = Node::new(ids.next_id(), NodeKind::Layout, "layout.section");
    section.styles = NodeStyles {
        base: Some(StyleSheet {
            background_color: Some("#ffffff".to_string()),
            padding: Some(FourSide::sides("96px", "64px", "96px", "64px")),
            ..Default::default()
        }),
        mobile: Some(StyleSheet {
            padding: Some(FourSide::sides("72px", "24px", "72px", "24px")),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut wrapper = Node::new(ids.next_id(), NodeKind::Layout, "layout.column");
    wrapper.styles.base = Some(StyleSheet {
        display: Some("flex".to_string()),
        flex_direction: Some("column".to_string()),
        gap: Some("20px".to_string()),
        max_width: Some("780px".to_string()),
        margin: Some(FourSide::horizontal("auto", "auto")),
        text_align: Some("center".to_string()),
        ..Default::default()
    });

    let mut heading = text_node(ids, "Launch high-converting pages in minutes", "h1");
    heading.styles = NodeStyles {
        base: Some(StyleSheet {
            font_size: Some("56px".to_string()),
            line_height: Some("1.1".to_string()),
            font_weight: Some(crate::styles::NumberOrString::Number(700.0)),
            ..Default::default()
        }),
        mobile: Some(StyleSheet {
            font_size: Some("36px".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut subheading = text_node(
        ids,
        "Design landing pages and launch campaigns without code.",
        "p",
    );
    subheading.styles.base = Some(StyleSheet {
        font_size: Some("18px".to_string()),
        color: Some("#475569".to_string()),
        line_height: Some("1.6".to_string()),
        margin: Some(FourSide::horizontal("auto", "auto")),
        max_width: Some("560px".to_string()),
        ..Default::default()
    });

    let mut button_row = Node::new(ids.next_id(), NodeKind::Layout, "layout.row");
    button_row.styles = NodeStyles {
        base: Some(StyleSheet {
            display: Some("flex".to_string()),
            justify_content: Some("center".to_string()),
            gap: Some("16px".to_string()),
            ..Default::default()
        }),
        mobile: Some(StyleSheet {
            flex_direction: Some("column".to_string()),
            align_items: Some("stretch".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let primary = button_node(ids, "Get started", "primary");
    let secondary = button_node(ids, "Watch demo", "secondary");

    button_row.children = vec![primary.id.clone(), secondary.id.clone()];
    wrapper.children = vec![heading.id.clone(), subheading.id.clone(), button_row.id.clone()];
    section.children = vec![wrapper.id.clone()];

    BlockDefinition {
        root_id: section.id.clone(),
        nodes: vec![section, wrapper, heading, subheading, button_row, primary, secondary],
    }
}

fn create_cta_block(ids: &mut IdGenerator) -> BlockDefinition {
    let mut section = Node::new(ids.next_id(), NodeKind::Layout, "layout.section");
    section.styles.base = Some(StyleSheet {
        background_color: Some("#0f172a".to_string()),
        padding: Some(FourSide::sides("64px", "32px", "64px", "32px")),
        text_align: Some("center".to_string()),
        ..Default::default()
    });

    let mut prompt = text_node(ids, "Ready to ship your next page?", "h2");
    prompt.styles.base = Some(StyleSheet {
        color: Some("#ffffff".to_string()),
        font_size: Some("32px".to_string()),
        ..Default::default()
    });

    let button = button_node(ids, "Start free", "primary");

    section.children = vec![prompt.id.clone(), button.id.clone()];

    BlockDefinition {
        root_id: section.id.clone(),
        nodes: vec![section, prompt, button],
    }
}

fn create_feature_columns_block(ids: &mut IdGenerator) -> BlockDefinition {
    let mut grid = Node::new(ids.next_id(), NodeKind::Layout, "layout.columns-3");
    grid.styles = NodeStyles {
        base: Some(StyleSheet {
            display: Some("grid".to_string()),
            gap: Some("24px".to_string()),
            grid_template_columns: Some("repeat(3, minmax(0, 1fr))".to_string()),
            ..Default::default()
        }),
        mobile: Some(StyleSheet {
            grid_template_columns: Some("1fr".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let stats = [
        ("120%", "Growth rate", "Increase in conversions"),
        ("14k", "Published pages", "Live across all plans"),
        ("99.9%", "Uptime", "Measured over the last year"),
    ];

    let mut nodes = Vec::new();
    for (value, label, description) in stats {
        let mut column = Node::new(ids.next_id(), NodeKind::Layout, "layout.column");
        column.styles.base = Some(StyleSheet {
            display: Some("flex".to_string()),
            flex_direction: Some("column".to_string()),
            gap: Some("16px".to_string()),
            ..Default::default()
        });

        let mut stat = Node::new(ids.next_id(), NodeKind::Component, "content.stat");
        stat.props = json!({ "value": value, "label": label, "description": description })
            .as_object()
            .cloned()
            .unwrap_or_default();

        column.children = vec![stat.id.clone()];
        grid.children.push(column.id.clone());
        nodes.push(column);
        nodes.push(stat);
    }

    let root_id = grid.id.clone();
    let mut all = vec![grid];
    all.extend(nodes);

    BlockDefinition {
        root_id,
        nodes: all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_blocks_are_internally_consistent() {
        let mut ids = IdGenerator::new("test-page");

        for template in builtin_blocks() {
            let block = template.create(&mut ids);

            let known: HashSet<_> = block.nodes.iter().map(|n| n.id.clone()).collect();
            assert_eq!(known.len(), block.nodes.len(), "{}: duplicate ids", template.id);
            assert!(known.contains(&block.root_id), "{}: root missing", template.id);

            for node in &block.nodes {
                for child in &node.children {
                    assert!(known.contains(child), "{}: dangling child", template.id);
                }
            }
        }
    }

    #[test]
    fn test_repeated_instantiation_mints_fresh_ids() {
        let mut ids = IdGenerator::new("test-page");
        let template = &builtin_blocks()[0];

        let first = template.create(&mut ids);
        let second = template.create(&mut ids);

        let first_ids: HashSet<_> = first.nodes.iter().map(|n| n.id.clone()).collect();
        assert!(second.nodes.iter().all(|n| !first_ids.contains(&n.id)));
    }

    #[test]
    fn test_hero_block_shape() {
        let mut ids = IdGenerator::new("test-page");
        let hero = builtin_blocks()
            .into_iter()
            .find(|t| t.id == "hero")
            .unwrap()
            .create(&mut ids);

        assert_eq!(hero.nodes.len(), 7);
        let section = hero.nodes.iter().find(|n| n.id == hero.root_id).unwrap();
        assert_eq!(section.component, "layout.section");
        assert_eq!(section.children.len(), 1);
    }
}
