//! Document store and transaction engine
//!
//! The store owns the live document and is its single writer. A transaction
//! runs a mutator over a draft of a working copy; the draft records forward
//! and inverse patches while it edits. Commit swaps the working copy in,
//! bumps the version, and files the patches with the history.
//!
//! Undo and redo replay patches against a scratch clone first and swap only
//! on success, so a patch that no longer fits the document (an internal
//! consistency failure) leaves the prior snapshot intact.

use crate::draft::{DocumentDraft, DraftOutcome};
use crate::patch::apply_patch;
use crate::undo_stack::{TransactionPatch, UndoStack};
use mindloom_document::Document;
use tracing::{debug, error};

/// Single-writer holder of the live document
#[derive(Debug)]
pub struct DocumentStore {
    doc: Document,

    /// Increments on every committed transaction, undo and redo
    version: u64,

    history: UndoStack,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    pub fn from_document(doc: Document) -> Self {
        Self {
            doc,
            version: 0,
            history: UndoStack::new(),
        }
    }

    /// Current read-only snapshot, valid until the next transaction
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Run a mutator as one recorded transaction
    ///
    /// Returns true when the mutator changed anything; a no-op mutator
    /// records no history and leaves the snapshot untouched.
    pub fn execute<F>(&mut self, mutator: F) -> bool
    where
        F: FnOnce(&mut DocumentDraft),
    {
        self.commit(true, None, mutator)
    }

    /// Recorded transaction with an undo-menu label
    pub fn execute_labeled<F>(&mut self, label: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut DocumentDraft),
    {
        self.commit(true, Some(label.to_string()), mutator)
    }

    /// Unrecorded transaction (measurement reports, layout write-back)
    pub fn execute_silent<F>(&mut self, mutator: F) -> bool
    where
        F: FnOnce(&mut DocumentDraft),
    {
        self.commit(false, None, mutator)
    }

    fn commit<F>(&mut self, record_history: bool, label: Option<String>, mutator: F) -> bool
    where
        F: FnOnce(&mut DocumentDraft),
    {
        let mut working = self.doc.clone();
        let mut draft = DocumentDraft::new(&mut working);
        mutator(&mut draft);

        match draft.finish() {
            DraftOutcome::Unchanged => false,

            DraftOutcome::Changed { redo, undo } => {
                self.doc = working;
                self.version += 1;
                if record_history {
                    let mut entry = TransactionPatch::new(undo, redo);
                    entry.label = label;
                    self.history.push(entry);
                }
                true
            }

            DraftOutcome::Poisoned => {
                error!("transaction aborted; prior document snapshot kept");
                false
            }
        }
    }

    /// Revert the most recent recorded transaction
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_for_undo() else {
            debug!("undo skipped: history is empty");
            return false;
        };

        let mut working = self.doc.clone();
        match apply_patch(&mut working, &entry.undo) {
            Ok(()) => {
                self.doc = working;
                self.version += 1;
                self.history.push_undone(entry);
                true
            }
            Err(err) => {
                error!(%err, "undo patch failed to replay; entry discarded");
                false
            }
        }
    }

    /// Reapply the most recently undone transaction
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_for_redo() else {
            debug!("redo skipped: redo stack is empty");
            return false;
        };

        let mut working = self.doc.clone();
        match apply_patch(&mut working, &entry.redo) {
            Ok(()) => {
                self.doc = working;
                self.version += 1;
                self.history.push_redone(entry);
                true
            }
            Err(err) => {
                error!(%err, "redo patch failed to replay; entry discarded");
                false
            }
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
