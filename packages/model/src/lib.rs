//! # Pagesmith Model
//!
//! Core data model for the page-composition engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: tree payload → Document              │
//! │  - Node/Tree arena with ordered children    │
//! │  - Per-breakpoint style declarations        │
//! │  - Component manifest registry              │
//! │  - Normalize/serialize + block templates    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations over the Document         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: node + breakpoint → style        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The model is the single source of truth: styles and computed output
//! are derived views; mutations live in `pagesmith-editor`.

pub mod blocks;
pub mod document;
pub mod id_generator;
pub mod manifest;
pub mod node;
pub mod styles;

pub use blocks::{builtin_blocks, BlockDefinition, BlockTemplate};
pub use document::{
    container_backfill_styles, sample_tree, AssetRef, Document, SAMPLE_ROOT_ID,
    TREE_FORMAT_VERSION,
};
pub use id_generator::{get_document_seed, IdGenerator};
pub use manifest::{
    is_layout_component, ControlKind, ManifestEntry, Registry, StyleControl, StyleHandle,
};
pub use node::{IntegrityError, Node, NodeId, NodeKind, Tree};
pub use styles::{
    Background, Breakpoint, FourSide, GradientStop, NodeStyles, NumberOrString, StyleSheet,
};
