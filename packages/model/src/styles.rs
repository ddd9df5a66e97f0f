//! # Style Model
//!
//! Per-breakpoint visual declarations. A node carries a `base` sheet
//! (desktop/default) plus optional `tablet`/`mobile` override sheets;
//! resolution shallow-merges an override sheet over the base, key by key.
//!
//! Spacing values (padding, margin, border width) may be authored either
//! as a single scalar or as an explicit per-side record. Backgrounds are
//! either a solid literal or an ordered gradient stop list.

use serde::{Deserialize, Serialize};

/// Viewport class used to key style overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }

    /// Inclusive viewport range in CSS pixels, `None` = unbounded.
    pub fn viewport(&self) -> (Option<u32>, Option<u32>) {
        match self {
            Self::Desktop => (Some(1280), None),
            Self::Tablet => (Some(768), Some(1279)),
            Self::Mobile => (None, Some(767)),
        }
    }
}

/// A four-sided spacing value: single scalar or explicit per-side record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FourSide {
    Shorthand(String),
    Sides {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bottom: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<String>,
    },
}

impl FourSide {
    /// Canonical per-side expansion: `[top, right, bottom, left]`.
    ///
    /// Missing sides fall back the way the original payloads did: top
    /// defaults to "0", right follows top, bottom follows top, left
    /// follows right.
    pub fn expand(&self) -> [String; 4] {
        match self {
            Self::Shorthand(value) => [
                value.clone(),
                value.clone(),
                value.clone(),
                value.clone(),
            ],
            Self::Sides {
                top,
                right,
                bottom,
                left,
            } => {
                let top = top.clone().unwrap_or_else(|| "0".to_string());
                let right = right.clone().unwrap_or_else(|| top.clone());
                let bottom = bottom.clone().unwrap_or_else(|| top.clone());
                let left = left.clone().unwrap_or_else(|| right.clone());
                [top, right, bottom, left]
            }
        }
    }

    /// Single CSS shorthand string (`"t r b l"`); scalars pass through.
    pub fn to_shorthand(&self) -> String {
        match self {
            Self::Shorthand(value) => value.clone(),
            Self::Sides { .. } => {
                let [top, right, bottom, left] = self.expand();
                format!("{top} {right} {bottom} {left}")
            }
        }
    }

    pub fn sides(
        top: impl Into<String>,
        right: impl Into<String>,
        bottom: impl Into<String>,
        left: impl Into<String>,
    ) -> Self {
        Self::Sides {
            top: Some(top.into()),
            right: Some(right.into()),
            bottom: Some(bottom.into()),
            left: Some(left.into()),
        }
    }

    pub fn horizontal(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Sides {
            top: None,
            right: Some(right.into()),
            bottom: None,
            left: Some(left.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: String,
    /// Stop position in percent.
    pub position: f64,
}

/// Background declaration: a solid literal or an ordered gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Solid {
        value: String,
    },
    Gradient {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default)]
        stops: Vec<GradientStop>,
    },
}

impl Background {
    /// Render to a single CSS value; gradients keep authored stop order.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Solid { value } => Some(value.clone()),
            Self::Gradient { stops, .. } => {
                if stops.is_empty() {
                    return None;
                }
                let rendered: Vec<String> = stops
                    .iter()
                    .map(|stop| format!("{} {}%", stop.color, stop.position))
                    .collect();
                Some(format!("linear-gradient(90deg, {})", rendered.join(", ")))
            }
        }
    }
}

/// A numeric-or-keyword scalar (font weight is authored both ways).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn to_css(&self) -> String {
        match self {
            Self::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Self::Number(n) => format!("{n}"),
            Self::Text(s) => s.clone(),
        }
    }
}

macro_rules! style_sheet {
    ($($(#[$meta:meta])* $field:ident : $ty:ty),+ $(,)?) => {
        /// One breakpoint's worth of visual declarations. All fields are
        /// optional; absent keys fall through to the base sheet during
        /// resolution.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct StyleSheet {
            $(
                $(#[$meta])*
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        impl StyleSheet {
            /// Shallow-merge `over` on top of `self`: present keys win,
            /// absent keys fall through.
            pub fn overlay(&self, over: &StyleSheet) -> StyleSheet {
                let mut merged = self.clone();
                $(
                    if over.$field.is_some() {
                        merged.$field = over.$field.clone();
                    }
                )+
                merged
            }

            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )+
            }
        }
    };
}

style_sheet! {
    display: String,
    flex_direction: String,
    flex_wrap: String,
    justify_content: String,
    align_items: String,
    flex: String,
    gap: String,
    row_gap: String,
    column_gap: String,
    grid_template_columns: String,
    padding: FourSide,
    margin: FourSide,
    width: String,
    height: String,
    max_width: String,
    min_height: String,
    text_align: String,
    background: Background,
    background_color: String,
    background_image: String,
    background_size: String,
    background_position: String,
    background_repeat: String,
    border_radius: String,
    border_width: FourSide,
    border_color: String,
    border_style: String,
    box_shadow: String,
    box_sizing: String,
    color: String,
    font_size: String,
    font_weight: NumberOrString,
    line_height: String,
}

/// Per-breakpoint style bag carried by every node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<StyleSheet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<StyleSheet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<StyleSheet>,
}

impl NodeStyles {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.tablet.is_none() && self.mobile.is_none()
    }

    /// The slot an edit at `breakpoint` lands in; desktop maps to `base`.
    pub fn slot(&self, breakpoint: Breakpoint) -> Option<&StyleSheet> {
        match breakpoint {
            Breakpoint::Desktop => self.base.as_ref(),
            Breakpoint::Tablet => self.tablet.as_ref(),
            Breakpoint::Mobile => self.mobile.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, breakpoint: Breakpoint) -> &mut StyleSheet {
        let slot = match breakpoint {
            Breakpoint::Desktop => &mut self.base,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Mobile => &mut self.mobile,
        };
        slot.get_or_insert_with(StyleSheet::default)
    }
}
