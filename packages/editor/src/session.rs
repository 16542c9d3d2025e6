//! # Edit Session
//!
//! The explicit context object for one open document: owns the store, the id
//! generator, the selection, the current canvas view and the layout debounce
//! state. Constructed at startup and passed by reference — there is no
//! ambient global state.
//!
//! Everything runs on one logical thread. The only asynchronous boundary is
//! the layout debounce: bursts of content-size reports coalesce into a
//! single deferred layout pass, flushed by `tick`. Debouncing delays *when*
//! layout runs, never *which* mutation applies.

use crate::clipboard::{copy_selection, paste_payload, ClipboardPayload};
use crate::errors::EditorError;
use crate::ops::{EditOutcome, StructuralEdit};
use crate::store::DocumentStore;
use mindloom_common::{IdGenerator, Point, Rect};
use mindloom_document::{Document, DocumentFile, Node, NodeId, NodePayload};
use mindloom_layout::{layout_document, CanvasView, LayoutConfig};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::warn;

/// How long a content-size burst is allowed to settle before layout runs
pub const SIZE_REPORT_DEBOUNCE: Duration = Duration::from_millis(120);

/// One open document with its editing state
pub struct EditSession {
    store: DocumentStore,
    ids: IdGenerator,
    layout_config: LayoutConfig,

    /// Latest positioned view, rebuilt after every commit or debounce flush
    view: CanvasView,

    /// Deadline of a pending debounced layout pass
    pending_layout: Option<Instant>,

    /// Currently selected node ids (fed by the host's selection queries)
    pub selection: Vec<NodeId>,
}

impl EditSession {
    /// Fresh empty document for a project path
    pub fn new(project_path: &str) -> Self {
        Self::from_document(project_path, Document::new())
    }

    /// Wrap an existing document
    pub fn from_document(project_path: &str, doc: Document) -> Self {
        let mut ids = IdGenerator::new(project_path);
        ids.advance_past(doc.nodes.keys().filter_map(|id| id.sequence()));

        let mut session = Self {
            store: DocumentStore::from_document(doc),
            ids,
            layout_config: LayoutConfig::default(),
            view: CanvasView::default(),
            pending_layout: None,
            selection: Vec::new(),
        };
        session.relayout();
        session
    }

    /// Accept the persisted projection
    pub fn load(project_path: &str, file: DocumentFile) -> Result<Self, EditorError> {
        Ok(Self::from_document(project_path, file.into_document()?))
    }

    /// Produce the persisted projection
    pub fn save(&self) -> DocumentFile {
        DocumentFile::from_document(self.store.document())
    }

    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout_config = config;
        self.relayout();
        self
    }

    /// Current read-only snapshot, valid until the next transaction
    pub fn document(&self) -> &Document {
        self.store.document()
    }

    /// Latest positioned view for the renderer
    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn can_undo(&self) -> bool {
        self.store.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.history().can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.store.history().undo_description()
    }

    /// Apply a structural edit as one recorded transaction
    pub fn edit(&mut self, edit: StructuralEdit) -> EditOutcome {
        let ids = &mut self.ids;
        let mut outcome = EditOutcome::default();
        self.store.execute_labeled(edit.label(), |draft| {
            outcome = edit.apply(draft, ids);
        });
        self.after_commit();

        let doc = self.store.document();
        self.selection.retain(|id| doc.contains(id));
        outcome
    }

    /// Create a free root node at a position (recorded)
    pub fn add_root_node(&mut self, text: impl Into<String>, x: f64, y: f64) -> NodeId {
        let id = NodeId::new(self.ids.new_id());
        let node = Node::text(id.clone(), text).at(x, y);
        self.store.execute_labeled("add node", |draft| {
            draft.insert_node(node);
            draft.add_root(&id);
        });
        self.after_commit();
        id
    }

    /// Replace a node's payload (recorded)
    pub fn set_payload(&mut self, id: &NodeId, payload: NodePayload) {
        self.store.execute_labeled("edit content", |draft| {
            draft.set_payload(id, payload);
        });
        self.after_commit();
    }

    /// Replace a text node's body (recorded)
    pub fn set_node_text(&mut self, id: &NodeId, text: impl Into<String>) {
        let is_text = self
            .store
            .document()
            .get(id)
            .map(|n| matches!(n.payload, NodePayload::Text { .. }));

        match is_text {
            Some(true) => self.set_payload(id, NodePayload::text(text)),
            Some(false) => warn!(node = %id, "set_node_text skipped: not a text node"),
            None => warn!(node = %id, "set_node_text skipped: unknown node"),
        }
    }

    /// User-driven resize; pins the size against measurement reports (recorded)
    pub fn resize_node(&mut self, id: &NodeId, width: f64, height: f64) {
        self.store.execute_labeled("resize node", |draft| {
            draft.set_size(id, width, height);
            draft.set_fixed_size(id, true);
        });
        self.after_commit();
    }

    /// Drag a free root to a new position (recorded)
    pub fn move_root(&mut self, id: &NodeId, x: f64, y: f64) {
        if !self.store.document().is_root(id) {
            warn!(node = %id, "move_root skipped: not a free root");
            return;
        }
        self.store.execute_labeled("move node", |draft| {
            draft.set_position(id, x, y);
        });
        self.after_commit();
    }

    /// Content measurement arrived from the host
    ///
    /// Not a user edit: commits silently (no history) and defers layout
    /// through the debounce window. A newer report supersedes a pending one.
    pub fn report_content_size(&mut self, id: &NodeId, width: f64, height: f64, now: Instant) {
        let Some(node) = self.store.document().get(id) else {
            warn!(node = %id, "size report skipped: unknown node");
            return;
        };
        if node.fixed_size {
            return;
        }

        let changed = self
            .store
            .execute_silent(|draft| draft.set_size(id, width, height));
        if changed {
            self.pending_layout = Some(now + SIZE_REPORT_DEBOUNCE);
        }
    }

    /// Run a pending debounced layout pass whose deadline expired
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.pending_layout {
            if now >= deadline {
                self.pending_layout = None;
                self.relayout();
            }
        }
    }

    /// True when a debounced layout pass is still waiting
    pub fn layout_pending(&self) -> bool {
        self.pending_layout.is_some()
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.store.undo();
        if undone {
            self.after_commit();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.store.redo();
        if redone {
            self.after_commit();
        }
        redone
    }

    /// Serialize the current selection for the clipboard
    ///
    /// `live` is the host's visual geometry snapshot; it wins over the
    /// document's cached positions.
    pub fn copy(&self, live: &HashMap<NodeId, Rect>) -> ClipboardPayload {
        copy_selection(self.store.document(), &self.selection, live)
    }

    /// Insert a copied payload; the new roots become the selection
    pub fn paste(&mut self, payload: &ClipboardPayload, target: Option<Point>) -> Vec<NodeId> {
        let ids = &mut self.ids;
        let mut new_roots = Vec::new();
        self.store.execute_labeled("paste", |draft| {
            new_roots = paste_payload(draft, ids, payload, target);
        });
        self.after_commit();

        if !new_roots.is_empty() {
            self.selection = new_roots.clone();
        }
        new_roots
    }

    /// Commit follow-up: drop any pending debounce and rebuild the view
    fn after_commit(&mut self) {
        self.pending_layout = None;
        self.relayout();
    }

    /// Rebuild the canvas view and write derived positions back into the
    /// document as the cached `x`/`y` of attached nodes (silently — layout
    /// caching is not a user edit)
    fn relayout(&mut self) {
        let view = layout_document(self.store.document(), &self.layout_config);

        let doc = self.store.document();
        let updates: Vec<(NodeId, f64, f64)> = view
            .nodes
            .iter()
            .filter(|placed| {
                doc.get(&placed.id).is_some_and(|node| {
                    !node.is_root() && (node.x != placed.x || node.y != placed.y)
                })
            })
            .map(|placed| (placed.id.clone(), placed.x, placed.y))
            .collect();

        if !updates.is_empty() {
            self.store.execute_silent(|draft| {
                for (id, x, y) in &updates {
                    draft.set_position(id, *x, *y);
                }
            });
        }

        self.view = view;
    }
}
