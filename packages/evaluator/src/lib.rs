//! # Pagesmith Evaluator
//!
//! Derived views over the document model: per-node style resolution and
//! CSS emission for the preview surface.
//!
//! Everything in this crate is pure and reentrant: resolution reads the
//! node, never writes it, and is order-independent across calls. The
//! editor owns the authoritative document; this crate only computes.

mod css;
mod style;

pub use css::{render_document_css, CssDocument, CssRule};
pub use style::{resolve_style, ComputedStyle};
