//! # CSS Emission
//!
//! Renders computed styles to CSS text for the preview surface: one rule
//! per node keyed by a `data-node` attribute selector, with tablet and
//! mobile overrides wrapped in media queries derived from the breakpoint
//! viewport ranges.

use pagesmith_model::{Breakpoint, Document};
use tracing::debug;

use crate::style::{resolve_style, ComputedStyle};

/// CSS rule with selector, properties and an optional media query.
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selector: String,
    pub style: ComputedStyle,
    pub media_query: Option<String>,
}

/// Collection of CSS rules for one document.
#[derive(Debug, Clone, Default)]
pub struct CssDocument {
    pub rules: Vec<CssRule>,
}

impl CssDocument {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: CssRule) {
        self.rules.push(rule);
    }

    /// Convert to CSS text.
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        for rule in &self.rules {
            let indent = if rule.media_query.is_some() { "  " } else { "" };

            if let Some(query) = &rule.media_query {
                css.push_str(query);
                css.push_str(" {\n");
            }

            css.push_str(indent);
            css.push_str(&rule.selector);
            css.push_str(" {\n");
            for (property, value) in rule.style.iter() {
                css.push_str(indent);
                css.push_str("  ");
                css.push_str(property);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }
            css.push_str(indent);
            css.push_str("}\n");

            if rule.media_query.is_some() {
                css.push_str("}\n");
            }
            css.push('\n');
        }

        css
    }
}

fn media_query(breakpoint: Breakpoint) -> Option<String> {
    let (min, max) = breakpoint.viewport();
    match (min, max) {
        (None, None) => None,
        (Some(min), None) => Some(format!("@media (min-width: {min}px)")),
        (None, Some(max)) => Some(format!("@media (max-width: {max}px)")),
        (Some(min), Some(max)) => Some(format!(
            "@media (min-width: {min}px) and (max-width: {max}px)"
        )),
    }
}

/// Render every node of the document to CSS: base rules first, then
/// tablet/mobile rules for nodes that carry overrides at that breakpoint.
pub fn render_document_css(document: &Document) -> String {
    let mut css_doc = CssDocument::new();
    let tree = &document.tree;

    let mut ids: Vec<&String> = tree.nodes.keys().collect();
    ids.sort();

    for id in &ids {
        if let Some(node) = tree.get(id) {
            css_doc.add_rule(CssRule {
                selector: format!("[data-node=\"{id}\"]"),
                style: resolve_style(node, Breakpoint::Desktop),
                media_query: None,
            });
        }
    }

    for breakpoint in [Breakpoint::Tablet, Breakpoint::Mobile] {
        for id in &ids {
            let Some(node) = tree.get(id) else { continue };
            if node.styles.slot(breakpoint).is_none() {
                continue;
            }
            css_doc.add_rule(CssRule {
                selector: format!("[data-node=\"{id}\"]"),
                style: resolve_style(node, breakpoint),
                media_query: media_query(breakpoint),
            });
        }
    }

    debug!(rules = css_doc.rules.len(), "rendered document css");
    css_doc.to_css()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_queries_follow_viewport_ranges() {
        assert_eq!(media_query(Breakpoint::Desktop), Some("@media (min-width: 1280px)".to_string()));
        assert_eq!(
            media_query(Breakpoint::Tablet),
            Some("@media (min-width: 768px) and (max-width: 1279px)".to_string())
        );
        assert_eq!(
            media_query(Breakpoint::Mobile),
            Some("@media (max-width: 767px)".to_string())
        );
    }

    #[test]
    fn test_render_document_css_emits_overrides_in_media_blocks() {
        let payload = json!({
            "version": "1",
            "root": "root",
            "nodes": {
                "root": {
                    "id": "root", "type": "layout", "component": "layout.section", "children": ["t"],
                    "styles": { "base": { "width": "100%" } }
                },
                "t": {
                    "id": "t", "type": "component", "component": "content.richText",
                    "children": [],
                    "styles": { "base": { "fontSize": "18px" }, "mobile": { "fontSize": "14px" } }
                }
            }
        });
        let document = pagesmith_model::Document::from_payload(
            Some(&payload),
            serde_json::Map::new(),
            Vec::new(),
        );

        let css = render_document_css(&document);

        assert!(css.contains("[data-node=\"root\"] {"));
        assert!(css.contains("width: 100%;"));
        assert!(css.contains("@media (max-width: 767px)"));
        assert!(css.contains("font-size: 14px;"));
        // Only the text node carries a mobile override.
        assert_eq!(css.matches("@media").count(), 1);
    }

    #[test]
    fn test_rule_text_shape() {
        let node = pagesmith_model::Node::new(
            "n",
            pagesmith_model::NodeKind::Component,
            "content.richText",
        );

        let mut doc = CssDocument::new();
        doc.add_rule(CssRule {
            selector: ".card".to_string(),
            style: resolve_style(&node, Breakpoint::Desktop),
            media_query: None,
        });

        let css = doc.to_css();
        assert!(css.starts_with(".card {\n"));
        assert!(css.contains("  box-sizing: border-box;\n"));
    }
}
