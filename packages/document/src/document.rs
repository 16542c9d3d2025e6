//! Document table and tree queries
//!
//! A `Document` holds the node table, the ordered root list, and the manual
//! edge list. Tree walks are iterative (explicit stack) so pathological deep
//! trees never exhaust the call stack.
//!
//! Invariants that must hold after every committed transaction:
//!
//! 1. Acyclicity: no node is its own transitive descendant
//! 2. Bidirectional consistency: `n.parent == Some(p)` iff `n.id` appears in
//!    `p.children`, exactly once
//! 3. Root consistency: `n.parent == None` iff `n.id` is in `roots`
//! 4. Children lists carry no duplicates and no dangling ids
//! 5. Edges never reference a missing node

use crate::edge::{Edge, EdgeId};
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

/// A consistency violation detected by [`Document::validate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("node {0} is referenced but missing from the node table")]
    MissingNode(NodeId),

    #[error("node {child} is listed under {parent} but its parent link is {actual:?}")]
    ParentMismatch {
        child: NodeId,
        parent: NodeId,
        actual: Option<NodeId>,
    },

    #[error("node {0} appears more than once in a children list")]
    DuplicateChild(NodeId),

    #[error("root list entry {0} still has a parent link")]
    RootHasParent(NodeId),

    #[error("node {0} has no parent but is missing from the root list")]
    OrphanedNode(NodeId),

    #[error("root list contains {0} more than once")]
    DuplicateRoot(NodeId),

    #[error("node {0} is its own transitive ancestor")]
    Cycle(NodeId),

    #[error("edge {0} references a missing node")]
    DanglingEdge(EdgeId),
}

/// The canonical canvas document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Every node, keyed by id
    pub nodes: HashMap<NodeId, Node>,

    /// Free roots in creation order
    pub roots: Vec<NodeId>,

    /// Manual cross-links in creation order
    pub edges: Vec<Edge>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_root(&self, id: &NodeId) -> bool {
        self.roots.contains(id)
    }

    pub fn edge_index(&self, id: &EdgeId) -> Option<usize> {
        self.edges.iter().position(|e| &e.id == id)
    }

    /// Position of `id` within its parent's children list
    pub fn position_in_parent(&self, id: &NodeId) -> Option<(NodeId, usize)> {
        let parent_id = self.get(id)?.parent.clone()?;
        let parent = self.get(&parent_id)?;
        let index = parent.children.iter().position(|c| c == id)?;
        Some((parent_id, index))
    }

    /// Collect `id` and every transitive descendant, preorder
    ///
    /// Dangling child references are skipped rather than reported; the walk
    /// degrades by omission.
    pub fn subtree(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                if &current != id {
                    warn!(node = %current, "subtree walk skipped a dangling child reference");
                }
                continue;
            };
            // Reverse push keeps sibling order in the output
            for child in node.children.iter().rev() {
                stack.push(child.clone());
            }
            out.push(current);
        }

        out
    }

    /// True when `id` is a strict transitive descendant of `ancestor`
    ///
    /// Walks `children` transitively from `ancestor`, matching how the
    /// reparent cycle check is defined.
    pub fn is_descendant(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        if id == ancestor {
            return false;
        }

        let mut stack: Vec<NodeId> = match self.nodes.get(ancestor) {
            Some(node) => node.children.clone(),
            None => return false,
        };

        while let Some(current) = stack.pop() {
            if &current == id {
                return true;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().cloned());
            }
        }

        false
    }

    /// Check every structural invariant, returning the first violation
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut root_seen = HashSet::new();
        for root_id in &self.roots {
            if !root_seen.insert(root_id.clone()) {
                return Err(InvariantViolation::DuplicateRoot(root_id.clone()));
            }
            let root = self
                .nodes
                .get(root_id)
                .ok_or_else(|| InvariantViolation::MissingNode(root_id.clone()))?;
            if root.parent.is_some() {
                return Err(InvariantViolation::RootHasParent(root_id.clone()));
            }
        }

        for (id, node) in &self.nodes {
            if node.parent.is_none() && !root_seen.contains(id) {
                return Err(InvariantViolation::OrphanedNode(id.clone()));
            }

            let mut child_seen = HashSet::new();
            for child_id in &node.children {
                if !child_seen.insert(child_id.clone()) {
                    return Err(InvariantViolation::DuplicateChild(child_id.clone()));
                }
                let child = self
                    .nodes
                    .get(child_id)
                    .ok_or_else(|| InvariantViolation::MissingNode(child_id.clone()))?;
                if child.parent.as_ref() != Some(id) {
                    return Err(InvariantViolation::ParentMismatch {
                        child: child_id.clone(),
                        parent: id.clone(),
                        actual: child.parent.clone(),
                    });
                }
            }

            if let Some(parent_id) = &node.parent {
                let parent = self
                    .nodes
                    .get(parent_id)
                    .ok_or_else(|| InvariantViolation::MissingNode(parent_id.clone()))?;
                if parent.children.iter().filter(|c| *c == id).count() != 1 {
                    return Err(InvariantViolation::ParentMismatch {
                        child: id.clone(),
                        parent: parent_id.clone(),
                        actual: node.parent.clone(),
                    });
                }
            }
        }

        // Acyclicity: a parent chain longer than the table means a loop
        for id in self.nodes.keys() {
            let mut steps = 0usize;
            let mut current = id;
            while let Some(parent) = self.nodes.get(current).and_then(|n| n.parent.as_ref()) {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(InvariantViolation::Cycle(id.clone()));
                }
                current = parent;
            }
        }

        for edge in &self.edges {
            if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
                return Err(InvariantViolation::DanglingEdge(edge.id.clone()));
            }
        }

        Ok(())
    }
}
