//! # Mindloom Layout
//!
//! Pure tree layout for the canvas: document in, positioned view out.
//!
//! ## Algorithm
//!
//! Two traversals per root, both iterative:
//!
//! 1. **Measure** (post-order): every subtree reserves an `area height` — the
//!    larger of the node's own height and its stacked children — so sibling
//!    subtrees can never collide and a tall node is never clipped by smaller
//!    descendants.
//! 2. **Place** (pre-order): the root sits at its user-owned position;
//!    children start one horizontal gap right of the parent's edge, vertically
//!    centered as a block on the parent's center, each child centered inside
//!    its reserved band.
//!
//! Layout never mutates the document and never fails: a missing node id is
//! skipped with a warning and the pass degrades by omission.

pub mod estimate;
pub mod tree;
pub mod virt;

pub use estimate::effective_size;
pub use tree::{layout_document, layout_tree, measure_area_heights};
pub use virt::{CanvasView, PositionedNode, ViewEdge, ViewEdgeKind};

/// Spacing and grid parameters for a layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Gap between a parent's right edge and its children column
    pub horizontal_gap: f64,

    /// Gap between consecutive sibling areas
    pub vertical_gap: f64,

    /// Estimated dimensions snap up to multiples of this
    pub grid_unit: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 40.0,
            vertical_gap: 20.0,
            grid_unit: 10.0,
        }
    }
}
