//! # Style Resolution
//!
//! Pure mapping from a node plus a target breakpoint to a flattened set
//! of CSS declarations.
//!
//! Resolution starts from the `base` sheet (always applied); for
//! non-desktop breakpoints the matching override sheet is shallow-merged
//! on top, key by key: present keys win, absent keys fall through.
//! Four-sided spacing collapses to a single shorthand, backgrounds render
//! to one value, and `box-sizing` defaults to `border-box`.
//!
//! The resolver never mutates the node and is safe to call repeatedly.

use pagesmith_model::{Breakpoint, Node, StyleSheet};
use std::collections::BTreeMap;

/// Flattened CSS property map, ordered for deterministic output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn set(&mut self, property: &str, value: impl Into<String>) {
        self.properties.insert(property.to_string(), value.into());
    }
}

/// Resolve a node's effective style at `breakpoint`.
pub fn resolve_style(node: &Node, breakpoint: Breakpoint) -> ComputedStyle {
    let base = node.styles.base.clone().unwrap_or_default();
    let merged = match breakpoint {
        Breakpoint::Desktop => base,
        _ => match node.styles.slot(breakpoint) {
            Some(overrides) => base.overlay(overrides),
            None => base,
        },
    };
    flatten(&merged)
}

fn flatten(sheet: &StyleSheet) -> ComputedStyle {
    let mut out = ComputedStyle::default();

    macro_rules! passthrough {
        ($($field:ident => $property:literal),+ $(,)?) => {
            $(
                if let Some(value) = &sheet.$field {
                    out.set($property, value.clone());
                }
            )+
        };
    }

    passthrough! {
        display => "display",
        flex_direction => "flex-direction",
        flex_wrap => "flex-wrap",
        justify_content => "justify-content",
        align_items => "align-items",
        flex => "flex",
        gap => "gap",
        row_gap => "row-gap",
        column_gap => "column-gap",
        grid_template_columns => "grid-template-columns",
        width => "width",
        height => "height",
        max_width => "max-width",
        min_height => "min-height",
        text_align => "text-align",
        background_color => "background-color",
        background_image => "background-image",
        background_size => "background-size",
        background_position => "background-position",
        background_repeat => "background-repeat",
        border_radius => "border-radius",
        border_color => "border-color",
        border_style => "border-style",
        box_shadow => "box-shadow",
        color => "color",
        font_size => "font-size",
        line_height => "line-height",
    }

    if let Some(padding) = &sheet.padding {
        out.set("padding", padding.to_shorthand());
    }
    if let Some(margin) = &sheet.margin {
        out.set("margin", margin.to_shorthand());
    }
    if let Some(border_width) = &sheet.border_width {
        out.set("border-width", border_width.to_shorthand());
    }
    if let Some(background) = &sheet.background {
        if let Some(rendered) = background.to_css() {
            out.set("background", rendered);
        }
    }
    if let Some(weight) = &sheet.font_weight {
        out.set("font-weight", weight.to_css());
    }

    match &sheet.box_sizing {
        Some(value) => out.set("box-sizing", value.clone()),
        None => out.set("box-sizing", "border-box"),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{
        Background, FourSide, GradientStop, NodeKind, NodeStyles, NumberOrString,
    };

    fn styled_node(styles: NodeStyles) -> Node {
        let mut node = Node::new("n-1", NodeKind::Component, "content.richText");
        node.styles = styles;
        node
    }

    #[test]
    fn test_desktop_uses_base_only() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                color: Some("#111".to_string()),
                font_size: Some("18px".to_string()),
                ..Default::default()
            }),
            mobile: Some(StyleSheet {
                font_size: Some("14px".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let computed = resolve_style(&node, Breakpoint::Desktop);
        assert_eq!(computed.get("font-size"), Some("18px"));
        assert_eq!(computed.get("color"), Some("#111"));
    }

    #[test]
    fn test_mobile_overrides_win_and_rest_falls_through() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                color: Some("#111".to_string()),
                font_size: Some("18px".to_string()),
                ..Default::default()
            }),
            mobile: Some(StyleSheet {
                font_size: Some("14px".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let computed = resolve_style(&node, Breakpoint::Mobile);
        assert_eq!(computed.get("font-size"), Some("14px"));
        assert_eq!(computed.get("color"), Some("#111"));
    }

    #[test]
    fn test_missing_breakpoint_slot_equals_base() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                gap: Some("8px".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let desktop = resolve_style(&node, Breakpoint::Desktop);
        let tablet = resolve_style(&node, Breakpoint::Tablet);
        assert_eq!(desktop, tablet);
    }

    #[test]
    fn test_four_side_values_collapse_to_shorthand() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                padding: Some(FourSide::Shorthand("12px".to_string())),
                margin: Some(FourSide::horizontal("auto", "auto")),
                border_width: Some(FourSide::sides("1px", "2px", "3px", "4px")),
                ..Default::default()
            }),
            ..Default::default()
        });

        let computed = resolve_style(&node, Breakpoint::Desktop);
        assert_eq!(computed.get("padding"), Some("12px"));
        assert_eq!(computed.get("margin"), Some("0 auto 0 auto"));
        assert_eq!(computed.get("border-width"), Some("1px 2px 3px 4px"));
    }

    #[test]
    fn test_gradient_background_renders_single_directive() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                background: Some(Background::Gradient {
                    value: None,
                    stops: vec![
                        GradientStop {
                            color: "#0ea5e9".to_string(),
                            position: 0.0,
                        },
                        GradientStop {
                            color: "#6366f1".to_string(),
                            position: 55.0,
                        },
                        GradientStop {
                            color: "#a855f7".to_string(),
                            position: 100.0,
                        },
                    ],
                }),
                ..Default::default()
            }),
            ..Default::default()
        });

        let computed = resolve_style(&node, Breakpoint::Desktop);
        assert_eq!(
            computed.get("background"),
            Some("linear-gradient(90deg, #0ea5e9 0%, #6366f1 55%, #a855f7 100%)")
        );
    }

    #[test]
    fn test_box_sizing_defaults_to_border_box() {
        let node = styled_node(NodeStyles::default());
        let computed = resolve_style(&node, Breakpoint::Desktop);
        assert_eq!(computed.get("box-sizing"), Some("border-box"));

        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                box_sizing: Some("content-box".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let computed = resolve_style(&node, Breakpoint::Desktop);
        assert_eq!(computed.get("box-sizing"), Some("content-box"));
    }

    #[test]
    fn test_font_weight_accepts_number_and_keyword() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                font_weight: Some(NumberOrString::Number(700.0)),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(
            resolve_style(&node, Breakpoint::Desktop).get("font-weight"),
            Some("700")
        );

        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                font_weight: Some(NumberOrString::Text("bold".to_string())),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(
            resolve_style(&node, Breakpoint::Desktop).get("font-weight"),
            Some("bold")
        );
    }

    #[test]
    fn test_resolution_does_not_mutate_node() {
        let node = styled_node(NodeStyles {
            base: Some(StyleSheet {
                color: Some("#111".to_string()),
                ..Default::default()
            }),
            mobile: Some(StyleSheet {
                color: Some("#222".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let before = node.clone();

        let _ = resolve_style(&node, Breakpoint::Mobile);
        let _ = resolve_style(&node, Breakpoint::Desktop);

        assert_eq!(node, before);
    }
}
