//! # Undo/Redo Stack
//!
//! Tracks mutation history for the editing session.
//!
//! Each committed mutation records its inverse (computed against the
//! pre-application tree) before being applied. Undo applies the inverse
//! and moves the entry to the redo stack; redo reapplies the original.
//! Committing a new mutation clears the redo stack.

use crate::mutations::{Mutation, MutationError};
use pagesmith_model::Tree;

/// One committed mutation together with its recorded inverse.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub mutation: Mutation,
    pub inverse: Mutation,
}

#[derive(Debug)]
pub struct UndoStack {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    /// Maximum number of undo levels (0 = unlimited).
    max_levels: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record an already-applied mutation and its inverse.
    pub fn record(&mut self, mutation: Mutation, inverse: Mutation) {
        self.undo_stack.push(UndoEntry { mutation, inverse });

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // A new action invalidates the future.
        self.redo_stack.clear();
    }

    /// Undo the most recent mutation. Returns the inverse that was
    /// applied, or `None` when there is nothing to undo.
    pub fn undo(&mut self, tree: &mut Tree) -> Result<Option<Mutation>, MutationError> {
        let Some(entry) = self.undo_stack.pop() else {
            return Ok(None);
        };

        if let Err(err) = entry.inverse.apply(tree) {
            self.undo_stack.push(entry);
            return Err(err);
        }

        let applied = entry.inverse.clone();
        self.redo_stack.push(entry);
        Ok(Some(applied))
    }

    /// Redo the most recently undone mutation. Returns the mutation that
    /// was reapplied, or `None` when there is nothing to redo.
    pub fn redo(&mut self, tree: &mut Tree) -> Result<Option<Mutation>, MutationError> {
        let Some(entry) = self.redo_stack.pop() else {
            return Ok(None);
        };

        if let Err(err) = entry.mutation.apply(tree) {
            self.redo_stack.push(entry);
            return Err(err);
        }

        let applied = entry.mutation.clone();
        self.undo_stack.push(entry);
        Ok(Some(applied))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
