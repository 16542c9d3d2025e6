//! # Undo/Redo Stack
//!
//! Tracks committed transaction patches and enables undo/redo.
//!
//! ## Design
//!
//! - Each committed transaction records a forward and an inverse patch
//! - Undo hands back the entry whose inverse should be replayed, then the
//!   entry moves to the redo stack
//! - Redo replays the forward patch and moves the entry back
//! - New transactions clear the redo stack
//! - The stack is bounded; the oldest entry is evicted on overflow

use crate::patch::Patch;

/// Default number of undo levels kept
pub const DEFAULT_UNDO_LEVELS: usize = 50;

/// The replayable record of one committed transaction
#[derive(Debug, Clone)]
pub struct TransactionPatch {
    /// Ops that revert the transaction (already ordered for replay)
    pub undo: Patch,

    /// Ops that reapply the transaction
    pub redo: Patch,

    /// Optional description of the transaction
    pub label: Option<String>,
}

impl TransactionPatch {
    pub fn new(undo: Patch, redo: Patch) -> Self {
        Self {
            undo,
            redo,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Bounded undo/redo history
#[derive(Debug)]
pub struct UndoStack {
    /// Committed transactions (most recent last)
    undo_stack: Vec<TransactionPatch>,

    /// Undone transactions (most recent last)
    redo_stack: Vec<TransactionPatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_UNDO_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record a freshly committed transaction
    ///
    /// Evicts the oldest entry past capacity and invalidates the redo stack.
    pub fn push(&mut self, entry: TransactionPatch) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Take the most recent entry for undoing
    ///
    /// The caller replays `entry.undo` and, on success, hands the entry to
    /// [`UndoStack::push_undone`].
    pub fn pop_for_undo(&mut self) -> Option<TransactionPatch> {
        self.undo_stack.pop()
    }

    /// File an undone entry on the redo stack
    pub fn push_undone(&mut self, entry: TransactionPatch) {
        self.redo_stack.push(entry);
    }

    /// Take the most recent undone entry for redoing
    pub fn pop_for_redo(&mut self) -> Option<TransactionPatch> {
        self.redo_stack.pop()
    }

    /// File a redone entry back on the undo stack (keeps the redo stack)
    pub fn push_redone(&mut self, entry: TransactionPatch) {
        self.undo_stack.push(entry);
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

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().and_then(|e| e.label.as_deref())
    }

    /// Description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().and_then(|e| e.label.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
