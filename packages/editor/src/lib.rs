//! # Mindloom Editor
//!
//! Transactional editing engine for a canvas document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: nodes + roots + edges             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: transactions + structural edits     │
//! │  - Draft records field-level patch pairs    │
//! │  - Bounded undo/redo replays patches        │
//! │  - Structural edits with cycle prevention   │
//! │  - Clipboard subtree round-trip             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ layout: document → positioned canvas view   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **All writes funnel through a transaction**: a mutator edits a draft,
//!    the draft records forward and inverse patches as it goes
//! 2. **Patches are structural**: field-level ops, never whole snapshots, so
//!    undo memory stays proportional to what changed
//! 3. **Failure is local containment**: a bad operation aborts itself with a
//!    warning and never corrupts the document
//! 4. **No ambient state**: the session object owns the store, the id
//!    generator and the layout cache, and is passed by reference
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mindloom_editor::{EditSession, StructuralEdit};
//!
//! let mut session = EditSession::new("/notes.mindloom");
//! let root = session.add_root_node("Trip planning", 100.0, 100.0);
//!
//! // Structural edit through the transaction engine
//! session.edit(StructuralEdit::InsertChild { parents: vec![root.clone()] });
//!
//! // Undo restores the pre-transaction document
//! session.undo();
//! ```

mod clipboard;
mod draft;
mod errors;
mod ops;
mod patch;
mod session;
mod store;
mod undo_stack;

pub use clipboard::{copy_selection, paste_payload, ClipboardNode, ClipboardPayload};
pub use draft::DocumentDraft;
pub use errors::EditorError;
pub use ops::{EditOutcome, Relation, StructuralEdit};
pub use patch::{apply_op, apply_patch, Patch, PatchError, PatchOp};
pub use session::EditSession;
pub use store::DocumentStore;
pub use undo_stack::{TransactionPatch, UndoStack, DEFAULT_UNDO_LEVELS};

// Re-export common types for convenience
pub use mindloom_document::{Document, DocumentFile, Edge, EdgeId, Node, NodeId, NodePayload};
pub use mindloom_layout::{CanvasView, LayoutConfig, PositionedNode, ViewEdge, ViewEdgeKind};
