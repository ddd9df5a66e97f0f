//! # Pagesmith Editor
//!
//! Document mutation engine for the page-composition tool.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: tree payload → Document              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Editor session + mutations          │
//! │  - Atomic validated structural edits        │
//! │  - Selection / hover / breakpoint cursors   │
//! │  - Change log + undo/redo with inverses     │
//! │  - Drag reparenting resolution              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: node + breakpoint → style        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: computed styles and preview
//!    snapshots are derived views.
//! 2. **Single writer**: the `Editor` is the sole owner of the document
//!    for the session; callers get immutable borrows only.
//! 3. **Reject, don't corrupt**: invalid references, root relocation and
//!    cycle-forming moves are detected before any write.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesmith_editor::Editor;
//! use pagesmith_model::{Document, NodeKind};
//!
//! let mut editor = Editor::with_document("page-1", Document::empty());
//! let root = editor.document().unwrap().tree.root.clone();
//!
//! let button = editor.add_node(&root, "content.button", NodeKind::Component, None)?;
//! editor.duplicate_node(&button)?;
//! editor.undo()?;
//! ```

mod dnd;
mod engine;
mod mutations;
mod undo_stack;

pub use dnd::{resolve_drop, DragPayload, DropRejected, DropResolution, DropTarget};
pub use engine::{Editor, EditorError};
pub use mutations::{Mutation, MutationError};
pub use undo_stack::{UndoEntry, UndoStack};
