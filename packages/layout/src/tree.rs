//! Two-pass tree layout
//!
//! Measure reserves an area height per subtree bottom-up; place assigns
//! absolute positions top-down. Both passes use explicit work stacks.

use crate::estimate::effective_size;
use crate::virt::{CanvasView, PositionedNode, ViewEdge};
use crate::LayoutConfig;
use mindloom_document::{Document, Node, NodeId};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Bottom-up pass: area height reserved for every subtree under `root`
///
/// Leaf: own height. Internal: the stacked children heights (plus gaps)
/// capped from below by the node's own height, so a large node is never
/// clipped by smaller descendants.
pub fn measure_area_heights(
    root: &NodeId,
    nodes: &HashMap<NodeId, Node>,
    config: &LayoutConfig,
) -> HashMap<NodeId, f64> {
    let mut heights = HashMap::new();
    let mut seen = HashSet::new();
    let mut stack = vec![(root.clone(), false)];

    while let Some((id, expanded)) = stack.pop() {
        let Some(node) = nodes.get(&id) else {
            warn!(node = %id, "measure skipped a missing node");
            continue;
        };

        if expanded {
            let own = effective_size(node, config.grid_unit).height;

            let mut stacked = 0.0;
            let mut present = 0usize;
            for child in &node.children {
                if let Some(area) = heights.get(child) {
                    stacked += area;
                    present += 1;
                }
            }
            if present > 1 {
                stacked += config.vertical_gap * (present - 1) as f64;
            }

            let area = if present == 0 { own } else { own.max(stacked) };
            heights.insert(id, area);
        } else {
            if !seen.insert(id.clone()) {
                continue;
            }
            stack.push((id.clone(), true));
            for child in &node.children {
                stack.push((child.clone(), false));
            }
        }
    }

    heights
}

/// Lay out one tree rooted at `root`
///
/// The root's stored position is authoritative; every descendant position is
/// derived. Output is one positioned node per reachable node plus one tree
/// edge per parent→child pair.
pub fn layout_tree(
    root: &NodeId,
    nodes: &HashMap<NodeId, Node>,
    config: &LayoutConfig,
) -> CanvasView {
    let mut view = CanvasView::default();

    let Some(root_node) = nodes.get(root) else {
        warn!(node = %root, "layout skipped a missing root");
        return view;
    };

    let heights = measure_area_heights(root, nodes, config);

    // Pre-order: (id, top-left x, top-left y)
    let mut stack = vec![(root.clone(), root_node.x, root_node.y)];

    while let Some((id, x, y)) = stack.pop() {
        let Some(node) = nodes.get(&id) else {
            continue;
        };
        let size = effective_size(node, config.grid_unit);

        view.nodes.push(PositionedNode {
            id: id.clone(),
            x,
            y,
            width: size.width,
            height: size.height,
            payload: node.payload.clone(),
        });

        let present: Vec<(&NodeId, f64)> = node
            .children
            .iter()
            .filter_map(|c| heights.get(c).map(|area| (c, *area)))
            .collect();
        if present.is_empty() {
            continue;
        }

        let block: f64 = present.iter().map(|(_, area)| area).sum::<f64>()
            + config.vertical_gap * (present.len() - 1) as f64;

        let child_x = x + size.width + config.horizontal_gap;
        let mut band_top = y + size.height / 2.0 - block / 2.0;

        let mut placed = Vec::with_capacity(present.len());
        for (child_id, area) in present {
            // heights only contains ids that resolved during measure
            let child_height = nodes
                .get(child_id)
                .map(|child| effective_size(child, config.grid_unit).height)
                .unwrap_or(0.0);

            let child_y = band_top + (area - child_height) / 2.0;
            placed.push((child_id.clone(), child_x, child_y));
            view.edges.push(ViewEdge::tree(id.clone(), child_id.clone()));
            band_top += area + config.vertical_gap;
        }

        // Reverse push keeps the emitted node list in pre-order
        stack.extend(placed.into_iter().rev());
    }

    view
}

/// Lay out every root of a document and append the manual cross-links
pub fn layout_document(doc: &Document, config: &LayoutConfig) -> CanvasView {
    let mut view = CanvasView::default();

    for root in &doc.roots {
        view.merge(layout_tree(root, &doc.nodes, config));
    }

    for edge in &doc.edges {
        if doc.contains(&edge.source) && doc.contains(&edge.target) {
            view.edges.push(ViewEdge::link(edge));
        } else {
            warn!(edge = %edge.id, "skipped a cross-link with a missing endpoint");
        }
    }

    view
}
