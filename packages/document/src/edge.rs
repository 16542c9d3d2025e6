//! Manual cross-link edges
//!
//! Edges are user-authored links between any two nodes. Structural
//! parent→child relationships are never stored here; layout derives them
//! from `children` on every pass.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique edge identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A manual link between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,

    /// Attachment point on the source node, when not the default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_anchor: Option<String>,

    /// Attachment point on the target node, when not the default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_anchor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_anchor: None,
            target_anchor: None,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_anchors(
        mut self,
        source_anchor: impl Into<String>,
        target_anchor: impl Into<String>,
    ) -> Self {
        self.source_anchor = Some(source_anchor.into());
        self.target_anchor = Some(target_anchor.into());
        self
    }

    /// True when either endpoint is `id`
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_touches_either_endpoint() {
        let edge = Edge::new("e-1", "a", "b");

        assert!(edge.touches(&NodeId::new("a")));
        assert!(edge.touches(&NodeId::new("b")));
        assert!(!edge.touches(&NodeId::new("c")));
    }

    #[test]
    fn test_edge_optional_fields_omitted() {
        let edge = Edge::new("e-1", "a", "b");
        let json = serde_json::to_string(&edge).unwrap();

        assert!(!json.contains("label"));
        assert!(!json.contains("anchor"));
    }
}
