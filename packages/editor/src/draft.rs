//! Mutable draft view of a document
//!
//! A mutator receives a `DocumentDraft`, edits through its setters, and
//! returns. Every setter validates its references, applies the change to the
//! working copy, and records the forward op together with its inverse
//! (captured from the pre-change value). Referential misses abort the single
//! setter with a warning; they never fail the transaction.
//!
//! A setter that validated but still failed to apply poisons the draft: the
//! store discards the working copy wholesale and keeps the previous snapshot
//! (fail-closed).

use crate::patch::{apply_op, Patch, PatchOp};
use mindloom_document::{Document, Edge, EdgeId, Node, NodeId, NodePayload};
use tracing::{error, warn};

/// What a finished draft amounts to
#[derive(Debug)]
pub(crate) enum DraftOutcome {
    /// The mutator changed nothing
    Unchanged,

    /// Committed changes with their replay patches
    Changed { redo: Patch, undo: Patch },

    /// A recorded op failed to apply; the working copy must be discarded
    Poisoned,
}

/// Mutable view of a document under a transaction
pub struct DocumentDraft<'a> {
    doc: &'a mut Document,
    redo: Patch,
    /// Inverse ops in application order; reversed when the draft finishes
    undo: Patch,
    poisoned: bool,
}

impl<'a> DocumentDraft<'a> {
    pub(crate) fn new(doc: &'a mut Document) -> Self {
        Self {
            doc,
            redo: Patch::new(),
            undo: Patch::new(),
            poisoned: false,
        }
    }

    /// Read access to the document as edited so far
    pub fn document(&self) -> &Document {
        self.doc
    }

    fn record(&mut self, forward: PatchOp, inverse: PatchOp) {
        if self.poisoned {
            return;
        }
        // Setters validate before recording, so failure here is an engine
        // inconsistency, not a caller mistake.
        if let Err(err) = apply_op(self.doc, &forward) {
            error!(%err, "draft op failed after validation; transaction poisoned");
            self.poisoned = true;
            return;
        }
        self.redo.push(forward);
        self.undo.push(inverse);
    }

    /// Register a new node
    ///
    /// The node's `parent`/`children` links are inserted as given; callers
    /// are responsible for making the other side of each link agree within
    /// the same transaction.
    pub fn insert_node(&mut self, node: Node) {
        if self.doc.contains(&node.id) {
            warn!(node = %node.id, "insert skipped: id already exists");
            return;
        }
        self.record(
            PatchOp::InsertNode { node: node.clone() },
            PatchOp::RemoveNode { node },
        );
    }

    /// Remove a node entry (links must already be cleaned up by the caller)
    pub fn remove_node(&mut self, id: &NodeId) {
        let Some(node) = self.doc.get(id).cloned() else {
            warn!(node = %id, "remove skipped: unknown node");
            return;
        };
        self.record(
            PatchOp::RemoveNode { node: node.clone() },
            PatchOp::InsertNode { node },
        );
    }

    pub fn set_parent(&mut self, id: &NodeId, parent: Option<NodeId>) {
        let Some(node) = self.doc.get(id) else {
            warn!(node = %id, "set_parent skipped: unknown node");
            return;
        };
        let previous = node.parent.clone();
        if previous == parent {
            return;
        }
        self.record(
            PatchOp::SetParent {
                id: id.clone(),
                parent,
            },
            PatchOp::SetParent {
                id: id.clone(),
                parent: previous,
            },
        );
    }

    pub fn set_children(&mut self, id: &NodeId, children: Vec<NodeId>) {
        let Some(node) = self.doc.get(id) else {
            warn!(node = %id, "set_children skipped: unknown node");
            return;
        };
        let previous = node.children.clone();
        if previous == children {
            return;
        }
        self.record(
            PatchOp::SetChildren {
                id: id.clone(),
                children,
            },
            PatchOp::SetChildren {
                id: id.clone(),
                children: previous,
            },
        );
    }

    pub fn set_position(&mut self, id: &NodeId, x: f64, y: f64) {
        let Some(node) = self.doc.get(id) else {
            warn!(node = %id, "set_position skipped: unknown node");
            return;
        };
        let (old_x, old_y) = (node.x, node.y);
        if old_x == x && old_y == y {
            return;
        }
        self.record(
            PatchOp::SetPosition {
                id: id.clone(),
                x,
                y,
            },
            PatchOp::SetPosition {
                id: id.clone(),
                x: old_x,
                y: old_y,
            },
        );
    }

    pub fn set_size(&mut self, id: &NodeId, width: f64, height: f64) {
        let Some(node) = self.doc.get(id) else {
            warn!(node = %id, "set_size skipped: unknown node");
            return;
        };
        let (old_w, old_h) = (node.width, node.height);
        if old_w == width && old_h == height {
            return;
        }
        self.record(
            PatchOp::SetSize {
                id: id.clone(),
                width,
                height,
            },
            PatchOp::SetSize {
                id: id.clone(),
                width: old_w,
                height: old_h,
            },
        );
    }

    pub fn set_fixed_size(&mut self, id: &NodeId, fixed: bool) {
        let Some(node) = self.doc.get(id) else {
            warn!(node = %id, "set_fixed_size skipped: unknown node");
            return;
        };
        let previous = node.fixed_size;
        if previous == fixed {
            return;
        }
        self.record(
            PatchOp::SetFixedSize {
                id: id.clone(),
                fixed,
            },
            PatchOp::SetFixedSize {
                id: id.clone(),
                fixed: previous,
            },
        );
    }

    pub fn set_payload(&mut self, id: &NodeId, payload: NodePayload) {
        let Some(node) = self.doc.get(id) else {
            warn!(node = %id, "set_payload skipped: unknown node");
            return;
        };
        let previous = node.payload.clone();
        if previous == payload {
            return;
        }
        self.record(
            PatchOp::SetPayload {
                id: id.clone(),
                payload,
            },
            PatchOp::SetPayload {
                id: id.clone(),
                payload: previous,
            },
        );
    }

    /// Append a node to the root list
    pub fn add_root(&mut self, id: &NodeId) {
        if !self.doc.contains(id) {
            warn!(node = %id, "add_root skipped: unknown node");
            return;
        }
        if self.doc.is_root(id) {
            warn!(node = %id, "add_root skipped: already a root");
            return;
        }
        let index = self.doc.roots.len();
        self.record(
            PatchOp::AddRoot {
                id: id.clone(),
                index,
            },
            PatchOp::RemoveRoot { id: id.clone() },
        );
    }

    pub fn remove_root(&mut self, id: &NodeId) {
        let Some(index) = self.doc.roots.iter().position(|r| r == id) else {
            warn!(node = %id, "remove_root skipped: not a root");
            return;
        };
        self.record(
            PatchOp::RemoveRoot { id: id.clone() },
            PatchOp::AddRoot {
                id: id.clone(),
                index,
            },
        );
    }

    /// Append a manual edge
    pub fn push_edge(&mut self, edge: Edge) {
        if !self.doc.contains(&edge.source) || !self.doc.contains(&edge.target) {
            warn!(edge = %edge.id, "push_edge skipped: missing endpoint");
            return;
        }
        if self.doc.edge_index(&edge.id).is_some() {
            warn!(edge = %edge.id, "push_edge skipped: id already exists");
            return;
        }
        let index = self.doc.edges.len();
        self.record(
            PatchOp::InsertEdge {
                index,
                edge: edge.clone(),
            },
            PatchOp::RemoveEdge { index, edge },
        );
    }

    pub fn remove_edge(&mut self, id: &EdgeId) {
        let Some(index) = self.doc.edge_index(id) else {
            warn!(edge = %id, "remove_edge skipped: unknown edge");
            return;
        };
        let edge = self.doc.edges[index].clone();
        self.record(
            PatchOp::RemoveEdge {
                index,
                edge: edge.clone(),
            },
            PatchOp::InsertEdge { index, edge },
        );
    }

    pub(crate) fn finish(self) -> DraftOutcome {
        if self.poisoned {
            return DraftOutcome::Poisoned;
        }
        if self.redo.is_empty() {
            return DraftOutcome::Unchanged;
        }
        let mut undo = self.undo;
        undo.reverse();
        DraftOutcome::Changed {
            redo: self.redo,
            undo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::apply_patch;

    fn seeded() -> Document {
        let mut doc = Document::new();
        let node = Node::text("a", "hello").at(5.0, 5.0);
        doc.roots.push(node.id.clone());
        doc.nodes.insert(node.id.clone(), node);
        doc
    }

    #[test]
    fn test_draft_records_mirrored_patches() {
        let mut doc = seeded();
        let before = doc.clone();

        let mut draft = DocumentDraft::new(&mut doc);
        draft.set_position(&NodeId::new("a"), 50.0, 60.0);
        let DraftOutcome::Changed { redo, undo } = draft.finish() else {
            panic!("expected a change");
        };

        // Forward already applied in place
        assert_eq!(doc.get(&NodeId::new("a")).unwrap().x, 50.0);

        // Inverse restores the original document
        apply_patch(&mut doc, &undo).unwrap();
        assert_eq!(doc, before);

        // Forward replays the change
        apply_patch(&mut doc, &redo).unwrap();
        assert_eq!(doc.get(&NodeId::new("a")).unwrap().y, 60.0);
    }

    #[test]
    fn test_noop_setter_records_nothing() {
        let mut doc = seeded();

        let mut draft = DocumentDraft::new(&mut doc);
        draft.set_position(&NodeId::new("a"), 5.0, 5.0); // unchanged value
        draft.set_parent(&NodeId::new("a"), None); // already parentless

        assert!(matches!(draft.finish(), DraftOutcome::Unchanged));
    }

    #[test]
    fn test_unknown_reference_aborts_single_setter() {
        let mut doc = seeded();

        let mut draft = DocumentDraft::new(&mut doc);
        draft.set_position(&NodeId::new("ghost"), 1.0, 1.0);
        draft.set_position(&NodeId::new("a"), 9.0, 9.0);

        // The bad setter was contained; the good one committed
        let DraftOutcome::Changed { redo, .. } = draft.finish() else {
            panic!("expected a change");
        };
        assert_eq!(redo.len(), 1);
    }

    #[test]
    fn test_inverse_order_reverses_application_order() {
        let mut doc = seeded();
        let before = doc.clone();

        let mut draft = DocumentDraft::new(&mut doc);
        let b = Node::text("b", "child").with_parent("a");
        draft.insert_node(b);
        draft.set_children(&NodeId::new("a"), vec![NodeId::new("b")]);
        let DraftOutcome::Changed { undo, .. } = draft.finish() else {
            panic!("expected a change");
        };

        // Undo must unlink before removing the node
        apply_patch(&mut doc, &undo).unwrap();
        assert_eq!(doc, before);
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_edge_round_trip_through_draft() {
        let mut doc = seeded();
        let b = Node::text("b", "other");
        doc.roots.push(b.id.clone());
        doc.nodes.insert(b.id.clone(), b);
        let before = doc.clone();

        let mut draft = DocumentDraft::new(&mut doc);
        draft.push_edge(Edge::new("e-1", "a", "b"));
        let DraftOutcome::Changed { undo, .. } = draft.finish() else {
            panic!("expected a change");
        };

        assert_eq!(doc.edges.len(), 1);
        apply_patch(&mut doc, &undo).unwrap();
        assert_eq!(doc, before);
    }
}
