//! Positioned output consumed by renderers
//!
//! A `CanvasView` is the layout engine's whole product: one positioned node
//! per logical node, structural edges derived from the tree, and the manual
//! cross-links appended. Renderers hold it read-only; it is rebuilt after
//! every committed transaction or debounced layout pass.

use mindloom_document::{Edge, NodeId, NodePayload};
use serde::{Deserialize, Serialize};

/// A node with absolute canvas coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub payload: NodePayload,
}

/// Where a view edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewEdgeKind {
    /// Derived parent→child connector
    Tree,
    /// User-authored cross-link
    Link,
}

/// A renderable edge between two positioned nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: ViewEdgeKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_anchor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_anchor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ViewEdge {
    /// Structural connector from a parent to one of its children
    pub fn tree(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            kind: ViewEdgeKind::Tree,
            source_anchor: None,
            target_anchor: None,
            label: None,
        }
    }

    /// Renderable projection of a manual edge
    pub fn link(edge: &Edge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            kind: ViewEdgeKind::Link,
            source_anchor: edge.source_anchor.clone(),
            target_anchor: edge.target_anchor.clone(),
            label: edge.label.clone(),
        }
    }
}

/// Full positioned view of a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasView {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<ViewEdge>,
}

impl CanvasView {
    pub fn find(&self, id: &NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn merge(&mut self, other: CanvasView) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }
}
