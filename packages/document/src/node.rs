//! Node envelope and payload union
//!
//! Every node shares one structural envelope (identity, parent link, ordered
//! children, cached geometry) around a tagged payload. The engine never looks
//! inside a payload except to estimate an unmeasured content size.

use mindloom_common::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Counter suffix of a generator-produced id (`seed-N` → `N`)
    pub fn sequence(&self) -> Option<u64> {
        self.0.rsplit('-').next()?.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Content payload kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodePayload {
    /// Plain text topic
    Text { text: String },

    /// Image referenced by a project-relative asset path
    Image {
        src: String,
        /// width / height of the source image, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        aspect_ratio: Option<f64>,
    },

    /// Link card with fetched metadata
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl NodePayload {
    pub fn text(text: impl Into<String>) -> Self {
        NodePayload::Text { text: text.into() }
    }

    pub fn image(src: impl Into<String>) -> Self {
        NodePayload::Image {
            src: src.into(),
            aspect_ratio: None,
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        NodePayload::Link {
            url: url.into(),
            title: None,
            description: None,
        }
    }
}

/// A canvas node: structural envelope plus content payload
///
/// `parent == None` marks a free root whose `x`/`y` the user owns; for
/// attached nodes `x`/`y` is a layout-derived cache overwritten on every
/// layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Owning parent (absent for free roots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// Ordered child ids; order is sibling display order
    #[serde(default)]
    pub children: Vec<NodeId>,

    /// Anchor position (top-left)
    pub x: f64,
    pub y: f64,

    /// Content box size; zero until measured or estimated
    pub width: f64,
    pub height: f64,

    /// User pinned the size; measurement reports stop overwriting it
    #[serde(default)]
    pub fixed_size: bool,

    pub payload: NodePayload,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, payload: NodePayload) -> Self {
        Self {
            id: id.into(),
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            fixed_size: false,
            payload,
        }
    }

    pub fn text(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self::new(id, NodePayload::text(text))
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_fixed_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self.fixed_size = true;
        self
    }

    /// Free root on the canvas (no owning parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
