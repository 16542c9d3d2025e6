//! Persisted document projection
//!
//! The on-disk shape is a JSON-friendly flattening of [`Document`]: the node
//! table becomes a list, and the root set is an explicit ordered list. Image
//! payloads carry project-relative asset paths; resolving them against the
//! project directory is the persistence adapter's job, not the engine's.

use crate::document::{Document, InvariantViolation};
use crate::edge::Edge;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// JSON projection of a document as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub nodes: Vec<Node>,
    pub roots: Vec<NodeId>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl DocumentFile {
    /// Project a live document for saving
    ///
    /// Nodes are sorted by id so repeated saves of the same document produce
    /// identical files.
    pub fn from_document(doc: &Document) -> Self {
        let mut nodes: Vec<Node> = doc.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            nodes,
            roots: doc.roots.clone(),
            edges: doc.edges.clone(),
        }
    }

    /// Rebuild a live document from the projection
    ///
    /// The result is validated before being handed back; a file that violates
    /// the structural invariants is rejected rather than loaded.
    pub fn into_document(self) -> Result<Document, InvariantViolation> {
        let mut doc = Document::new();
        for node in self.nodes {
            doc.nodes.insert(node.id.clone(), node);
        }
        doc.roots = self.roots;
        doc.edges = self.edges;

        doc.validate()?;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodePayload;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let mut root = Node::text("m-1", "Trip planning").at(100.0, 50.0);
        root.children = vec![NodeId::new("m-2")];
        let child = Node::new(
            "m-2",
            NodePayload::Image {
                src: "assets/map.png".to_string(),
                aspect_ratio: Some(1.5),
            },
        )
        .with_parent("m-1");

        doc.nodes.insert(root.id.clone(), root);
        doc.nodes.insert(child.id.clone(), child);
        doc.roots = vec![NodeId::new("m-1")];
        doc.edges = vec![Edge::new("e-1", "m-1", "m-2").with_label("see also")];
        doc
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let doc = sample_document();

        let file = DocumentFile::from_document(&doc);
        let json = serde_json::to_string_pretty(&file).unwrap();
        let parsed: DocumentFile = serde_json::from_str(&json).unwrap();
        let back = parsed.into_document().unwrap();

        assert_eq!(doc, back);
    }

    #[test]
    fn test_roots_serialize_as_list() {
        let file = DocumentFile::from_document(&sample_document());
        let json = serde_json::to_string(&file).unwrap();

        assert!(json.contains("\"roots\":[\"m-1\"]"));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let mut file = DocumentFile::from_document(&sample_document());
        file.roots.push(NodeId::new("ghost"));

        assert!(file.into_document().is_err());
    }

    #[test]
    fn test_save_is_deterministic() {
        let doc = sample_document();
        let a = serde_json::to_string(&DocumentFile::from_document(&doc)).unwrap();
        let b = serde_json::to_string(&DocumentFile::from_document(&doc)).unwrap();

        assert_eq!(a, b);
    }
}
