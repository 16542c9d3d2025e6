//! Structural edits
//!
//! High-level semantic operations on the canvas document, expressed as
//! mutation values applied inside a transaction.
//!
//! ## Semantics
//!
//! ### MoveTo
//! - Atomic relocation of a subtree under a new parent
//! - Rejected when source and target are the same node
//! - Rejected when the target sits inside the moved subtree (cycle)
//! - Rejected when the target is a root and the relation needs its parent
//!
//! ### Detach
//! - Converts an attached node into a free root at an explicit position
//! - The node's subtree travels with it
//!
//! ### Delete
//! - Removes each node with its full descendant subtree
//! - Every manual edge touching a removed id goes too
//! - A "next focus" candidate (previous sibling, next sibling, else parent)
//!   is reported so callers can restore a sensible selection
//!
//! Every rejection aborts only the offending operation, with a warning;
//! well-formed parts of a batch still apply.

use crate::draft::DocumentDraft;
use mindloom_common::IdGenerator;
use mindloom_document::{Edge, EdgeId, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Where a moved node lands relative to the drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Become the target's last child
    Child,
    /// Become the sibling directly before the target
    Above,
    /// Become the sibling directly after the target
    Below,
}

/// A semantic document edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralEdit {
    /// Create one empty child under each given parent
    InsertChild { parents: Vec<NodeId> },

    /// Create one empty sibling directly after each given node
    InsertSibling { siblings: Vec<NodeId> },

    /// Reparent `source` relative to `target`
    MoveTo {
        source: NodeId,
        target: NodeId,
        relation: Relation,
    },

    /// Turn an attached node into a free root at an explicit position
    Detach { id: NodeId, x: f64, y: f64 },

    /// Cascading delete of each id's whole subtree
    Delete { ids: Vec<NodeId> },

    /// Author a manual cross-link
    LinkNodes {
        source: NodeId,
        target: NodeId,
        label: Option<String>,
    },

    /// Remove a manual cross-link
    UnlinkNodes { edge: EdgeId },
}

/// What an applied edit produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOutcome {
    /// Ids of nodes created by the edit, in creation order
    pub created: Vec<NodeId>,

    /// Selection candidate after a delete
    pub next_focus: Option<NodeId>,
}

impl StructuralEdit {
    /// Undo-menu label
    pub fn label(&self) -> &'static str {
        match self {
            StructuralEdit::InsertChild { .. } => "insert child",
            StructuralEdit::InsertSibling { .. } => "insert sibling",
            StructuralEdit::MoveTo { .. } => "move node",
            StructuralEdit::Detach { .. } => "detach node",
            StructuralEdit::Delete { .. } => "delete",
            StructuralEdit::LinkNodes { .. } => "link nodes",
            StructuralEdit::UnlinkNodes { .. } => "remove link",
        }
    }

    /// Apply the edit to a draft
    pub fn apply(&self, draft: &mut DocumentDraft, ids: &mut IdGenerator) -> EditOutcome {
        let mut outcome = EditOutcome::default();

        match self {
            StructuralEdit::InsertChild { parents } => {
                for parent in parents {
                    if let Some(id) = insert_child(draft, ids, parent) {
                        outcome.created.push(id);
                    }
                }
            }

            StructuralEdit::InsertSibling { siblings } => {
                for sibling in siblings {
                    if let Some(id) = insert_sibling(draft, ids, sibling) {
                        outcome.created.push(id);
                    }
                }
            }

            StructuralEdit::MoveTo {
                source,
                target,
                relation,
            } => move_to(draft, source, target, *relation),

            StructuralEdit::Detach { id, x, y } => detach(draft, id, *x, *y),

            StructuralEdit::Delete { ids } => {
                outcome.next_focus = delete_cascading(draft, ids);
            }

            StructuralEdit::LinkNodes {
                source,
                target,
                label,
            } => {
                let mut edge = Edge::new(ids.new_id(), source.as_str(), target.as_str());
                edge.label = label.clone();
                draft.push_edge(edge);
            }

            StructuralEdit::UnlinkNodes { edge } => {
                draft.remove_edge(edge);
            }
        }

        outcome
    }
}

fn insert_child(
    draft: &mut DocumentDraft,
    ids: &mut IdGenerator,
    parent: &NodeId,
) -> Option<NodeId> {
    let Some(parent_node) = draft.document().get(parent) else {
        warn!(parent = %parent, "insert child skipped: unknown parent");
        return None;
    };

    let id = NodeId::new(ids.new_id());
    let mut children = parent_node.children.clone();
    children.push(id.clone());

    draft.insert_node(Node::text(id.clone(), "").with_parent(parent.as_str()));
    draft.set_children(parent, children);
    Some(id)
}

fn insert_sibling(
    draft: &mut DocumentDraft,
    ids: &mut IdGenerator,
    sibling: &NodeId,
) -> Option<NodeId> {
    let doc = draft.document();
    if !doc.contains(sibling) {
        warn!(node = %sibling, "insert sibling skipped: unknown node");
        return None;
    }
    let Some((parent, index)) = doc.position_in_parent(sibling) else {
        // Free roots have no sibling order to splice into
        debug!(node = %sibling, "insert sibling skipped: node has no parent");
        return None;
    };

    let id = NodeId::new(ids.new_id());
    let mut children = doc.get(&parent)?.children.clone();
    children.insert(index + 1, id.clone());

    draft.insert_node(Node::text(id.clone(), "").with_parent(parent.as_str()));
    draft.set_children(&parent, children);
    Some(id)
}

fn move_to(draft: &mut DocumentDraft, source: &NodeId, target: &NodeId, relation: Relation) {
    let doc = draft.document();

    if source == target {
        warn!(node = %source, "move skipped: source and target are the same node");
        return;
    }
    if !doc.contains(source) || !doc.contains(target) {
        warn!(source = %source, target = %target, "move skipped: missing node");
        return;
    }
    if doc.is_descendant(target, source) {
        warn!(source = %source, target = %target, "move skipped: would create a cycle");
        return;
    }

    let new_parent = match relation {
        Relation::Child => target.clone(),
        Relation::Above | Relation::Below => match doc.get(target).and_then(|t| t.parent.clone()) {
            Some(parent) => parent,
            None => {
                // Dropping beside a free root has no parent to splice into
                warn!(target = %target, "move skipped: target is a root");
                return;
            }
        },
    };

    // Unhook the source from wherever it lives
    if let Some((old_parent, index)) = doc.position_in_parent(source) {
        let mut children = match doc.get(&old_parent) {
            Some(p) => p.children.clone(),
            None => return,
        };
        children.remove(index);
        draft.set_children(&old_parent, children);
    } else if doc.is_root(source) {
        draft.remove_root(source);
    }
    draft.set_parent(source, Some(new_parent.clone()));

    // Splice into the new parent, reading the children as edited so far
    let Some(parent_node) = draft.document().get(&new_parent) else {
        return;
    };
    let mut children = parent_node.children.clone();
    match relation {
        Relation::Child => children.push(source.clone()),
        Relation::Above | Relation::Below => {
            let Some(target_index) = children.iter().position(|c| c == target) else {
                warn!(target = %target, "move skipped: target left its parent mid-edit");
                return;
            };
            let at = match relation {
                Relation::Above => target_index,
                _ => target_index + 1,
            };
            children.insert(at, source.clone());
        }
    }
    draft.set_children(&new_parent, children);
}

fn detach(draft: &mut DocumentDraft, id: &NodeId, x: f64, y: f64) {
    let doc = draft.document();
    let Some(node) = doc.get(id) else {
        warn!(node = %id, "detach skipped: unknown node");
        return;
    };
    if node.is_root() {
        debug!(node = %id, "detach skipped: already a free root");
        return;
    }

    if let Some((parent, index)) = doc.position_in_parent(id) {
        let mut children = match doc.get(&parent) {
            Some(p) => p.children.clone(),
            None => return,
        };
        children.remove(index);
        draft.set_children(&parent, children);
    }

    draft.set_parent(id, None);
    draft.add_root(id);
    draft.set_position(id, x, y);
}

/// Delete each id's subtree; returns the focus candidate computed before
/// anything was removed
fn delete_cascading(draft: &mut DocumentDraft, ids: &[NodeId]) -> Option<NodeId> {
    let next_focus = ids
        .first()
        .and_then(|id| next_focus_candidate(draft, id, ids));

    for id in ids {
        // An earlier delete may have removed this id as a descendant
        if !draft.document().contains(id) {
            continue;
        }
        delete_subtree(draft, id);
    }

    next_focus
}

fn delete_subtree(draft: &mut DocumentDraft, id: &NodeId) {
    let doc = draft.document();
    let members = doc.subtree(id);
    let member_set: HashSet<&NodeId> = members.iter().collect();

    // Unhook the subtree root
    if let Some((parent, index)) = doc.position_in_parent(id) {
        let mut children = match doc.get(&parent) {
            Some(p) => p.children.clone(),
            None => return,
        };
        children.remove(index);
        draft.set_children(&parent, children);
    } else if doc.is_root(id) {
        draft.remove_root(id);
    }

    // Drop every manual edge touching the subtree
    let stale: Vec<EdgeId> = draft
        .document()
        .edges
        .iter()
        .filter(|e| member_set.contains(&e.source) || member_set.contains(&e.target))
        .map(|e| e.id.clone())
        .collect();
    for edge in stale {
        draft.remove_edge(&edge);
    }

    // Remove leaves before parents so every intermediate state is replayable
    for member in members.iter().rev() {
        draft.remove_node(member);
    }
}

/// Previous sibling, else next sibling, else parent — skipping anything that
/// is itself about to be deleted
fn next_focus_candidate(
    draft: &DocumentDraft,
    id: &NodeId,
    deleting: &[NodeId],
) -> Option<NodeId> {
    let doc = draft.document();
    let (parent, index) = doc.position_in_parent(id)?;
    let siblings = &doc.get(&parent)?.children;

    let candidate = if index > 0 {
        siblings[index - 1].clone()
    } else if index + 1 < siblings.len() {
        siblings[index + 1].clone()
    } else {
        parent
    };

    if deleting.contains(&candidate) {
        None
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use mindloom_document::Document;

    fn ids() -> IdGenerator {
        IdGenerator::from_seed("t".to_string())
    }

    /// root → (a → (a1, a2), b)
    fn seeded_store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.execute(|draft| {
            draft.insert_node(Node::text("root", "root").at(0.0, 0.0));
            draft.add_root(&NodeId::new("root"));
            draft.insert_node(Node::text("a", "a").with_parent("root"));
            draft.insert_node(Node::text("b", "b").with_parent("root"));
            draft.set_children(&NodeId::new("root"), vec![NodeId::new("a"), NodeId::new("b")]);
            draft.insert_node(Node::text("a1", "a1").with_parent("a"));
            draft.insert_node(Node::text("a2", "a2").with_parent("a"));
            draft.set_children(&NodeId::new("a"), vec![NodeId::new("a1"), NodeId::new("a2")]);
        });
        store
    }

    fn children_of(doc: &Document, id: &str) -> Vec<String> {
        doc.get(&NodeId::new(id))
            .map(|n| n.children.iter().map(|c| c.as_str().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_insert_child_appends() {
        let mut store = seeded_store();
        let mut gen = ids();
        let mut outcome = EditOutcome::default();

        store.execute(|draft| {
            outcome = StructuralEdit::InsertChild {
                parents: vec![NodeId::new("b")],
            }
            .apply(draft, &mut gen);
        });

        assert_eq!(outcome.created.len(), 1);
        let created = &outcome.created[0];
        assert_eq!(children_of(store.document(), "b"), vec![created.as_str()]);
        assert_eq!(store.document().validate(), Ok(()));
    }

    #[test]
    fn test_insert_child_batch_over_many_parents() {
        let mut store = seeded_store();
        let mut gen = ids();
        let mut outcome = EditOutcome::default();

        store.execute(|draft| {
            outcome = StructuralEdit::InsertChild {
                parents: vec![NodeId::new("a1"), NodeId::new("a2"), NodeId::new("ghost")],
            }
            .apply(draft, &mut gen);
        });

        // The unknown parent was skipped, the rest created
        assert_eq!(outcome.created.len(), 2);
        assert_eq!(store.document().validate(), Ok(()));
    }

    #[test]
    fn test_insert_sibling_splices_after_source() {
        let mut store = seeded_store();
        let mut gen = ids();
        let mut outcome = EditOutcome::default();

        store.execute(|draft| {
            outcome = StructuralEdit::InsertSibling {
                siblings: vec![NodeId::new("a1")],
            }
            .apply(draft, &mut gen);
        });

        let created = outcome.created[0].as_str().to_string();
        assert_eq!(
            children_of(store.document(), "a"),
            vec!["a1".to_string(), created, "a2".to_string()]
        );
    }

    #[test]
    fn test_insert_sibling_of_root_is_noop() {
        let mut store = seeded_store();
        let mut gen = ids();
        let mut outcome = EditOutcome::default();

        let changed = store.execute(|draft| {
            outcome = StructuralEdit::InsertSibling {
                siblings: vec![NodeId::new("root")],
            }
            .apply(draft, &mut gen);
        });

        assert!(!changed);
        assert!(outcome.created.is_empty());
    }

    #[test]
    fn test_move_to_child_appends_to_target() {
        let mut store = seeded_store();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("b"),
                target: NodeId::new("a1"),
                relation: Relation::Child,
            }
            .apply(draft, &mut gen);
        });

        let doc = store.document();
        assert_eq!(children_of(doc, "root"), vec!["a"]);
        assert_eq!(children_of(doc, "a1"), vec!["b"]);
        assert_eq!(
            doc.get(&NodeId::new("b")).unwrap().parent,
            Some(NodeId::new("a1"))
        );
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_move_above_splices_before_target() {
        let mut store = seeded_store();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("b"),
                target: NodeId::new("a2"),
                relation: Relation::Above,
            }
            .apply(draft, &mut gen);
        });

        assert_eq!(children_of(store.document(), "a"), vec!["a1", "b", "a2"]);
        assert_eq!(store.document().validate(), Ok(()));
    }

    #[test]
    fn test_move_below_splices_after_target() {
        let mut store = seeded_store();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("a1"),
                target: NodeId::new("b"),
                relation: Relation::Below,
            }
            .apply(draft, &mut gen);
        });

        assert_eq!(children_of(store.document(), "root"), vec!["a", "b", "a1"]);
        assert_eq!(store.document().validate(), Ok(()));
    }

    #[test]
    fn test_move_into_own_descendant_is_rejected() {
        let mut store = seeded_store();
        let before = store.document().clone();
        let mut gen = ids();

        let changed = store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("a"),
                target: NodeId::new("a2"),
                relation: Relation::Child,
            }
            .apply(draft, &mut gen);
        });

        assert!(!changed);
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_move_onto_itself_is_rejected() {
        let mut store = seeded_store();
        let before = store.document().clone();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("a"),
                target: NodeId::new("a"),
                relation: Relation::Child,
            }
            .apply(draft, &mut gen);
        });

        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_move_beside_root_is_rejected() {
        let mut store = seeded_store();
        let before = store.document().clone();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("a1"),
                target: NodeId::new("root"),
                relation: Relation::Below,
            }
            .apply(draft, &mut gen);
        });

        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_root_reattaches_as_child() {
        let mut store = seeded_store();
        let mut gen = ids();
        store.execute(|draft| {
            draft.insert_node(Node::text("free", "free").at(300.0, 300.0));
            draft.add_root(&NodeId::new("free"));
        });

        store.execute(|draft| {
            StructuralEdit::MoveTo {
                source: NodeId::new("free"),
                target: NodeId::new("b"),
                relation: Relation::Child,
            }
            .apply(draft, &mut gen);
        });

        let doc = store.document();
        assert!(!doc.is_root(&NodeId::new("free")));
        assert_eq!(children_of(doc, "b"), vec!["free"]);
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_detach_makes_a_root_and_keeps_subtree() {
        let mut store = seeded_store();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::Detach {
                id: NodeId::new("a"),
                x: 500.0,
                y: 250.0,
            }
            .apply(draft, &mut gen);
        });

        let doc = store.document();
        let a = doc.get(&NodeId::new("a")).unwrap();
        assert!(a.is_root());
        assert_eq!((a.x, a.y), (500.0, 250.0));
        assert!(doc.is_root(&NodeId::new("a")));
        assert_eq!(children_of(doc, "root"), vec!["b"]);
        // The subtree stays attached to the detached node
        assert_eq!(children_of(doc, "a"), vec!["a1", "a2"]);
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_delete_cascades_and_cleans_edges() {
        let mut store = seeded_store();
        let mut gen = ids();
        store.execute(|draft| {
            draft.push_edge(Edge::new("e-1", "a1", "b"));
            draft.push_edge(Edge::new("e-2", "root", "b"));
        });

        store.execute(|draft| {
            StructuralEdit::Delete {
                ids: vec![NodeId::new("a")],
            }
            .apply(draft, &mut gen);
        });

        let doc = store.document();
        for gone in ["a", "a1", "a2"] {
            assert!(!doc.contains(&NodeId::new(gone)), "{} should be gone", gone);
        }
        // Edge touching the deleted subtree went with it; the other survived
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.edges[0].id, EdgeId::new("e-2"));
        assert_eq!(children_of(doc, "root"), vec!["b"]);
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_delete_reports_previous_sibling_as_focus() {
        let mut store = seeded_store();
        let mut gen = ids();
        let mut outcome = EditOutcome::default();

        store.execute(|draft| {
            outcome = StructuralEdit::Delete {
                ids: vec![NodeId::new("a2")],
            }
            .apply(draft, &mut gen);
        });

        assert_eq!(outcome.next_focus, Some(NodeId::new("a1")));
    }

    #[test]
    fn test_delete_focus_falls_back_to_next_sibling_then_parent() {
        let mut store = seeded_store();
        let mut gen = ids();
        let mut outcome = EditOutcome::default();

        store.execute(|draft| {
            outcome = StructuralEdit::Delete {
                ids: vec![NodeId::new("a1")],
            }
            .apply(draft, &mut gen);
        });
        assert_eq!(outcome.next_focus, Some(NodeId::new("a2")));

        store.execute(|draft| {
            outcome = StructuralEdit::Delete {
                ids: vec![NodeId::new("a2")],
            }
            .apply(draft, &mut gen);
        });
        assert_eq!(outcome.next_focus, Some(NodeId::new("a")));
    }

    #[test]
    fn test_delete_of_overlapping_selection_is_stable() {
        let mut store = seeded_store();
        let mut gen = ids();

        // "a1" is inside "a"'s subtree; deleting both must not double-remove
        store.execute(|draft| {
            StructuralEdit::Delete {
                ids: vec![NodeId::new("a"), NodeId::new("a1")],
            }
            .apply(draft, &mut gen);
        });

        let doc = store.document();
        assert!(!doc.contains(&NodeId::new("a")));
        assert!(!doc.contains(&NodeId::new("a1")));
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_link_and_unlink_nodes() {
        let mut store = seeded_store();
        let mut gen = ids();

        store.execute(|draft| {
            StructuralEdit::LinkNodes {
                source: NodeId::new("a1"),
                target: NodeId::new("b"),
                label: Some("depends on".to_string()),
            }
            .apply(draft, &mut gen);
        });

        let edge_id = store.document().edges[0].id.clone();
        assert_eq!(
            store.document().edges[0].label.as_deref(),
            Some("depends on")
        );

        store.execute(|draft| {
            StructuralEdit::UnlinkNodes { edge: edge_id }.apply(draft, &mut gen);
        });
        assert!(store.document().edges.is_empty());
    }
}
