//! # Component Manifest
//!
//! Static catalog of component-type definitions: default props, palette
//! metadata, style controls, and structural child whitelists. Loaded once
//! at process start and read-only afterwards; the mutation engine consults
//! it for defaults and type classification, the palette UI for labels.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Control widget rendered for a style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    Slider,
    Select,
    Color,
    FourSides,
    Toggle,
    Input,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleControl {
    pub property: String,
    #[serde(rename = "type")]
    pub control: ControlKind,
}

/// A group of style controls shown together in the inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleHandle {
    pub id: String,
    pub label: String,
    pub group: String,
    pub controls: Vec<StyleControl>,
}

/// Definition of one component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: String,
    pub category: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub default_props: serde_json::Map<String, Value>,
    #[serde(default)]
    pub style_handles: Vec<StyleHandle>,
    /// Whitelist of accepted child component keys; absent = any child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A `layout.*` key names a layout-capable container.
pub fn is_layout_component(key: &str) -> bool {
    key.starts_with("layout.")
}

/// Read-only component catalog with by-key lookup.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<ManifestEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Unknown keys resolve to `None`, treated as "no constraints".
    pub fn resolve(&self, key: &str) -> Option<&ManifestEntry> {
        self.index.get(key).map(|i| &self.entries[*i])
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Whitelist check: a parent without an entry, or without a whitelist,
    /// accepts anything.
    pub fn accepts_child(&self, parent_key: &str, child_key: &str) -> bool {
        match self.resolve(parent_key) {
            Some(entry) => match &entry.allowed_children {
                Some(allowed) if !allowed.is_empty() => {
                    allowed.iter().any(|k| k == child_key)
                }
                _ => true,
            },
            None => true,
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }
}

fn entry(
    key: &str,
    category: &str,
    label: &str,
    description: &str,
    default_props: Value,
) -> ManifestEntry {
    let default_props = match default_props {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    ManifestEntry {
        key: key.to_string(),
        category: category.to_string(),
        label: label.to_string(),
        description: Some(description.to_string()),
        default_props,
        style_handles: Vec::new(),
        allowed_children: None,
        thumbnail: None,
    }
}

fn handle(id: &str, label: &str, group: &str, controls: &[(&str, ControlKind)]) -> StyleHandle {
    StyleHandle {
        id: id.to_string(),
        label: label.to_string(),
        group: group.to_string(),
        controls: controls
            .iter()
            .map(|(property, control)| StyleControl {
                property: property.to_string(),
                control: *control,
            })
            .collect(),
    }
}

fn with_handles(mut entry: ManifestEntry, handles: Vec<StyleHandle>) -> ManifestEntry {
    entry.style_handles = handles;
    entry
}

fn with_children(mut entry: ManifestEntry, children: &[&str]) -> ManifestEntry {
    entry.allowed_children = Some(children.iter().map(|k| k.to_string()).collect());
    entry
}

fn spacing_handle() -> StyleHandle {
    handle(
        "spacing",
        "Spacing",
        "spacing",
        &[
            ("padding", ControlKind::FourSides),
            ("margin", ControlKind::FourSides),
        ],
    )
}

fn stack_layout_handle() -> StyleHandle {
    handle(
        "layout",
        "Layout",
        "layout",
        &[("display", ControlKind::Select), ("gap", ControlKind::Input)],
    )
}

fn typography_handle() -> StyleHandle {
    handle(
        "typography",
        "Typography",
        "typography",
        &[
            ("fontSize", ControlKind::Input),
            ("lineHeight", ControlKind::Input),
            ("fontWeight", ControlKind::Input),
            ("color", ControlKind::Color),
            ("textAlign", ControlKind::Select),
        ],
    )
}

fn sizing_handle() -> StyleHandle {
    handle(
        "layout",
        "Layout",
        "layout",
        &[
            ("width", ControlKind::Input),
            ("height", ControlKind::Input),
            ("borderRadius", ControlKind::Input),
        ],
    )
}

fn builtin_entries() -> Vec<ManifestEntry> {
    vec![
        with_children(
            with_handles(
                entry(
                    "layout.section",
                    "layout",
                    "Section",
                    "Full-width section container",
                    json!({ "background": { "type": "solid", "value": "surface-50" } }),
                ),
                vec![
                    spacing_handle(),
                    handle(
                        "background",
                        "Background",
                        "background",
                        &[("background", ControlKind::Color)],
                    ),
                    handle(
                        "layout",
                        "Layout",
                        "layout",
                        &[
                            ("maxWidth", ControlKind::Input),
                            ("margin", ControlKind::FourSides),
                        ],
                    ),
                ],
            ),
            &[
                "layout.row",
                "layout.columns-2",
                "layout.columns-3",
                "layout.columns-4",
                "layout.container",
                "layout.navbar",
                "layout.footer",
                "content.richText",
                "content.button",
                "content.image",
                "media.video",
                "media.slider",
            ],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.row",
                    "layout",
                    "Row",
                    "Horizontal flex row",
                    json!({ "direction": "row" }),
                ),
                vec![
                    handle(
                        "layout",
                        "Layout",
                        "layout",
                        &[
                            ("display", ControlKind::Select),
                            ("flexDirection", ControlKind::Select),
                            ("gap", ControlKind::Input),
                        ],
                    ),
                    spacing_handle(),
                ],
            ),
            &[
                "layout.column",
                "layout.container",
                "layout.navItem",
                "layout.navDropdown",
                "content.richText",
                "content.button",
                "content.image",
                "content.logo",
                "content.navLink",
                "content.stat",
                "forms.input",
                "forms.select",
                "forms.textarea",
                "media.video",
                "media.slider",
            ],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.column",
                    "layout",
                    "Column",
                    "Vertical stack",
                    json!({}),
                ),
                vec![stack_layout_handle(), spacing_handle()],
            ),
            &[
                "layout.container",
                "content.richText",
                "content.button",
                "content.image",
                "content.logo",
                "content.navLink",
                "content.stat",
                "forms.input",
                "forms.select",
                "forms.textarea",
                "media.video",
                "media.slider",
            ],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.container",
                    "layout",
                    "Container",
                    "Centered wrapper with max width",
                    json!({}),
                ),
                vec![
                    handle(
                        "layout",
                        "Layout",
                        "layout",
                        &[
                            ("width", ControlKind::Input),
                            ("maxWidth", ControlKind::Input),
                            ("margin", ControlKind::FourSides),
                        ],
                    ),
                    spacing_handle(),
                ],
            ),
            &[
                "layout.row",
                "layout.column",
                "content.richText",
                "content.button",
                "content.image",
                "content.logo",
                "content.navLink",
                "content.stat",
                "forms.input",
                "forms.select",
                "forms.textarea",
                "media.video",
                "media.slider",
            ],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.columns-2",
                    "layout",
                    "2 Columns",
                    "Even two-column layout",
                    json!({}),
                ),
                vec![stack_layout_handle(), spacing_handle()],
            ),
            &["layout.column"],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.columns-3",
                    "layout",
                    "3 Columns",
                    "Three responsive columns",
                    json!({}),
                ),
                vec![stack_layout_handle(), spacing_handle()],
            ),
            &["layout.column"],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.columns-4",
                    "layout",
                    "4 Columns",
                    "Four-column grid",
                    json!({}),
                ),
                vec![stack_layout_handle(), spacing_handle()],
            ),
            &["layout.column"],
        ),
        with_handles(
            entry(
                "content.richText",
                "content",
                "Text",
                "Rich text block",
                json!({ "text": "Start writing...", "tag": "p" }),
            ),
            vec![typography_handle(), spacing_handle()],
        ),
        with_handles(
            entry(
                "content.button",
                "content",
                "Button",
                "Call-to-action button",
                json!({ "label": "Click me", "href": "#", "variant": "primary" }),
            ),
            vec![spacing_handle(), sizing_handle()],
        ),
        with_handles(
            entry(
                "content.image",
                "media",
                "Image",
                "Image from the media library",
                json!({ "assetId": null, "alt": "", "objectFit": "cover" }),
            ),
            vec![sizing_handle()],
        ),
        with_handles(
            entry(
                "forms.input",
                "forms",
                "Form Input",
                "Single-line text input",
                json!({
                    "name": "email",
                    "label": "Email",
                    "placeholder": "you@example.com",
                    "type": "email",
                    "required": true
                }),
            ),
            vec![spacing_handle()],
        ),
        with_handles(
            entry(
                "forms.textarea",
                "forms",
                "Textarea",
                "Multi-line text input",
                json!({
                    "name": "message",
                    "label": "Message",
                    "placeholder": "Tell us more...",
                    "rows": 4
                }),
            ),
            vec![spacing_handle()],
        ),
        with_handles(
            entry(
                "forms.select",
                "forms",
                "Select",
                "Dropdown select field",
                json!({
                    "name": "plan",
                    "label": "Select option",
                    "options": "Option A\nOption B\nOption C"
                }),
            ),
            vec![spacing_handle()],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.navbar",
                    "layout",
                    "Navbar",
                    "Top navigation bar",
                    json!({}),
                ),
                vec![stack_layout_handle()],
            ),
            &["content.logo", "layout.navMenu", "content.button"],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.navMenu",
                    "layout",
                    "Nav Menu",
                    "Horizontal navigation list",
                    json!({}),
                ),
                vec![stack_layout_handle()],
            ),
            &["layout.navItem"],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.navItem",
                    "layout",
                    "Nav Item",
                    "Navigation link with optional dropdown",
                    json!({}),
                ),
                vec![stack_layout_handle()],
            ),
            &["content.navLink", "layout.navDropdown"],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.navDropdown",
                    "layout",
                    "Dropdown",
                    "Stack of dropdown links",
                    json!({}),
                ),
                vec![stack_layout_handle(), spacing_handle()],
            ),
            &["content.navLink"],
        ),
        with_children(
            with_handles(
                entry(
                    "layout.footer",
                    "layout",
                    "Footer",
                    "Footer container",
                    json!({}),
                ),
                vec![stack_layout_handle()],
            ),
            &[
                "layout.row",
                "content.richText",
                "content.button",
                "content.image",
                "content.logo",
            ],
        ),
        with_handles(
            entry(
                "content.logo",
                "content",
                "Logo",
                "Brand logo",
                json!({ "text": "Pagesmith", "href": "/", "url": "" }),
            ),
            vec![spacing_handle()],
        ),
        with_handles(
            entry(
                "content.navLink",
                "content",
                "Nav Link",
                "Navigation link",
                json!({ "label": "Menu", "href": "#" }),
            ),
            vec![typography_handle()],
        ),
        with_handles(
            entry(
                "content.stat",
                "content",
                "Statistic",
                "Number with label",
                json!({
                    "value": "120%",
                    "label": "Growth rate",
                    "description": "Increase in conversions"
                }),
            ),
            vec![typography_handle()],
        ),
        with_handles(
            entry(
                "media.video",
                "media",
                "Video",
                "Upload or embed a video",
                json!({ "source": "", "poster": "", "title": "Product walkthrough" }),
            ),
            vec![sizing_handle()],
        ),
        with_children(
            with_handles(
                entry(
                    "media.slider",
                    "media",
                    "Image Slider",
                    "Horizontal carousel of images",
                    json!({ "autoplay": "5000" }),
                ),
                vec![sizing_handle()],
            ),
            &["content.image"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown_keys() {
        let registry = Registry::builtin();

        let button = registry.resolve("content.button").unwrap();
        assert_eq!(button.label, "Button");
        assert_eq!(button.default_props["label"], "Click me");

        assert!(registry.resolve("custom.widget").is_none());
    }

    #[test]
    fn test_layout_classification_by_prefix() {
        assert!(is_layout_component("layout.row"));
        assert!(is_layout_component("layout.columns-3"));
        assert!(!is_layout_component("content.button"));
        assert!(!is_layout_component("media.slider"));
    }

    #[test]
    fn test_whitelist_enforced_when_present() {
        let registry = Registry::builtin();

        assert!(registry.accepts_child("layout.columns-2", "layout.column"));
        assert!(!registry.accepts_child("layout.columns-2", "content.button"));
        assert!(registry.accepts_child("layout.section", "content.button"));
    }

    #[test]
    fn test_missing_whitelist_accepts_anything() {
        let registry = Registry::builtin();

        // content.button has no whitelist, unknown parents have no entry.
        assert!(registry.accepts_child("content.button", "layout.row"));
        assert!(registry.accepts_child("custom.widget", "content.button"));
    }

    #[test]
    fn test_slider_accepts_only_images() {
        let registry = Registry::builtin();
        assert!(registry.accepts_child("media.slider", "content.image"));
        assert!(!registry.accepts_child("media.slider", "content.richText"));
    }
}
