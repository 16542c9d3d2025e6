//! Field-level document patches
//!
//! A transaction is described by two patches: the forward patch replays the
//! change, the inverse patch reverts it. Ops are field-granular so undo
//! storage is proportional to what changed, never to document size.
//!
//! Patch application is strict: an op that does not fit the document it is
//! replayed against is an internal consistency failure, reported as a
//! [`PatchError`] so the caller can abort fail-closed.

use mindloom_document::{Document, Edge, EdgeId, Node, NodeId, NodePayload};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One reversible field-level change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    /// Add a node to the table (carries the full node; inverse of removal)
    InsertNode { node: Node },

    /// Remove a node from the table (carries the full node so the inverse
    /// can restore it verbatim)
    RemoveNode { node: Node },

    SetParent {
        id: NodeId,
        parent: Option<NodeId>,
    },

    SetChildren {
        id: NodeId,
        children: Vec<NodeId>,
    },

    SetPosition {
        id: NodeId,
        x: f64,
        y: f64,
    },

    SetSize {
        id: NodeId,
        width: f64,
        height: f64,
    },

    SetFixedSize {
        id: NodeId,
        fixed: bool,
    },

    SetPayload {
        id: NodeId,
        payload: NodePayload,
    },

    /// Insert into the root list at a position (position matters so undo
    /// restores root order)
    AddRoot { id: NodeId, index: usize },

    RemoveRoot { id: NodeId },

    InsertEdge { index: usize, edge: Edge },

    RemoveEdge { index: usize, edge: Edge },
}

/// An ordered list of ops applied as one unit
pub type Patch = Vec<PatchOp>;

/// Internal consistency failure while replaying a patch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("node {0} already exists")]
    NodeExists(NodeId),

    #[error("node {0} is already in the root list")]
    AlreadyRoot(NodeId),

    #[error("node {0} is not in the root list")]
    NotARoot(NodeId),

    #[error("root index {0} is out of bounds")]
    RootIndexOutOfBounds(usize),

    #[error("edge index {0} is out of bounds")]
    EdgeIndexOutOfBounds(usize),

    #[error("edge at index {index} is {found}, expected {expected}")]
    EdgeMismatch {
        index: usize,
        expected: EdgeId,
        found: EdgeId,
    },
}

/// Apply a single op to a document
pub fn apply_op(doc: &mut Document, op: &PatchOp) -> Result<(), PatchError> {
    match op {
        PatchOp::InsertNode { node } => {
            if doc.contains(&node.id) {
                return Err(PatchError::NodeExists(node.id.clone()));
            }
            doc.nodes.insert(node.id.clone(), node.clone());
        }

        PatchOp::RemoveNode { node } => {
            doc.nodes
                .remove(&node.id)
                .ok_or_else(|| PatchError::NodeNotFound(node.id.clone()))?;
        }

        PatchOp::SetParent { id, parent } => {
            let node = doc
                .get_mut(id)
                .ok_or_else(|| PatchError::NodeNotFound(id.clone()))?;
            node.parent = parent.clone();
        }

        PatchOp::SetChildren { id, children } => {
            let node = doc
                .get_mut(id)
                .ok_or_else(|| PatchError::NodeNotFound(id.clone()))?;
            node.children = children.clone();
        }

        PatchOp::SetPosition { id, x, y } => {
            let node = doc
                .get_mut(id)
                .ok_or_else(|| PatchError::NodeNotFound(id.clone()))?;
            node.x = *x;
            node.y = *y;
        }

        PatchOp::SetSize { id, width, height } => {
            let node = doc
                .get_mut(id)
                .ok_or_else(|| PatchError::NodeNotFound(id.clone()))?;
            node.width = *width;
            node.height = *height;
        }

        PatchOp::SetFixedSize { id, fixed } => {
            let node = doc
                .get_mut(id)
                .ok_or_else(|| PatchError::NodeNotFound(id.clone()))?;
            node.fixed_size = *fixed;
        }

        PatchOp::SetPayload { id, payload } => {
            let node = doc
                .get_mut(id)
                .ok_or_else(|| PatchError::NodeNotFound(id.clone()))?;
            node.payload = payload.clone();
        }

        PatchOp::AddRoot { id, index } => {
            if doc.is_root(id) {
                return Err(PatchError::AlreadyRoot(id.clone()));
            }
            if *index > doc.roots.len() {
                return Err(PatchError::RootIndexOutOfBounds(*index));
            }
            doc.roots.insert(*index, id.clone());
        }

        PatchOp::RemoveRoot { id } => {
            let index = doc
                .roots
                .iter()
                .position(|r| r == id)
                .ok_or_else(|| PatchError::NotARoot(id.clone()))?;
            doc.roots.remove(index);
        }

        PatchOp::InsertEdge { index, edge } => {
            if *index > doc.edges.len() {
                return Err(PatchError::EdgeIndexOutOfBounds(*index));
            }
            doc.edges.insert(*index, edge.clone());
        }

        PatchOp::RemoveEdge { index, edge } => {
            if *index >= doc.edges.len() {
                return Err(PatchError::EdgeIndexOutOfBounds(*index));
            }
            if doc.edges[*index].id != edge.id {
                return Err(PatchError::EdgeMismatch {
                    index: *index,
                    expected: edge.id.clone(),
                    found: doc.edges[*index].id.clone(),
                });
            }
            doc.edges.remove(*index);
        }
    }

    Ok(())
}

/// Apply every op of a patch, in order
///
/// Callers that need fail-closed semantics apply the patch to a scratch
/// clone and swap only on success.
pub fn apply_patch(doc: &mut Document, patch: &Patch) -> Result<(), PatchError> {
    for op in patch {
        apply_op(doc, op)?;
    }
    Ok(())
}
