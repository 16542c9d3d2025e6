//! Clipboard codec
//!
//! Copy serializes the selected subtrees into a flat, self-contained payload;
//! paste remaps every id and re-inserts the nodes in one transaction. The OS
//! clipboard adapter only ever sees the JSON form of [`ClipboardPayload`].
//!
//! Geometry in the payload is fixed from the caller's live visual snapshot
//! rather than the document cache, because cached positions can lag the true
//! on-screen geometry while layout passes are still being debounced.

use crate::draft::DocumentDraft;
use mindloom_common::{IdGenerator, Point, Rect};
use mindloom_document::{Document, Node, NodeId, NodePayload};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Offset applied when pasting without a target position
const PASTE_NUDGE: f64 = 24.0;

/// One serialized node; id references are the original document's ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardNode {
    pub id: NodeId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    #[serde(default)]
    pub children: Vec<NodeId>,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    #[serde(default)]
    pub fixed_size: bool,

    pub payload: NodePayload,
}

/// A self-contained copied selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub nodes: Vec<ClipboardNode>,
}

impl ClipboardPayload {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Serialize a selection for the clipboard
///
/// Only "selection roots" are collected: an id whose parent is also selected
/// travels inside that parent's subtree already. Geometry comes from `live`
/// when the snapshot has the node, else from the document cache.
pub fn copy_selection(
    doc: &Document,
    selection: &[NodeId],
    live: &HashMap<NodeId, Rect>,
) -> ClipboardPayload {
    let selected: HashSet<&NodeId> = selection.iter().collect();
    let mut emitted: HashSet<NodeId> = HashSet::new();
    let mut nodes = Vec::new();

    for id in selection {
        let Some(node) = doc.get(id) else {
            continue;
        };
        if node
            .parent
            .as_ref()
            .is_some_and(|parent| selected.contains(parent))
        {
            continue;
        }

        for member_id in doc.subtree(id) {
            if !emitted.insert(member_id.clone()) {
                continue;
            }
            let Some(member) = doc.get(&member_id) else {
                continue;
            };
            let rect = live.get(&member_id).copied().unwrap_or_else(|| {
                Rect::new(member.x, member.y, member.width, member.height)
            });

            nodes.push(ClipboardNode {
                id: member_id,
                parent: member.parent.clone(),
                children: member.children.clone(),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                fixed_size: member.fixed_size,
                payload: member.payload.clone(),
            });
        }
    }

    ClipboardPayload { nodes }
}

/// Insert a copied payload back into the document
///
/// Every node gets a fresh id. A node keeps its (remapped) parent only when
/// that parent is part of the payload; otherwise it becomes a new free root.
/// Roots are offset so their bounding top-left lands on `target` (or nudged
/// slightly when no target is given); attached nodes keep their original
/// coordinates, which the next layout pass overwrites anyway.
///
/// Returns the ids of the new roots.
pub fn paste_payload(
    draft: &mut DocumentDraft,
    ids: &mut IdGenerator,
    payload: &ClipboardPayload,
    target: Option<Point>,
) -> Vec<NodeId> {
    if payload.is_empty() {
        return Vec::new();
    }

    let mapping: HashMap<NodeId, NodeId> = payload
        .nodes
        .iter()
        .map(|n| (n.id.clone(), NodeId::new(ids.new_id())))
        .collect();

    let becomes_root = |node: &ClipboardNode| -> bool {
        node.parent
            .as_ref()
            .map_or(true, |parent| !mapping.contains_key(parent))
    };

    let offset = match target {
        Some(point) => {
            let mut min_x = f64::INFINITY;
            let mut min_y = f64::INFINITY;
            for node in payload.nodes.iter().filter(|n| becomes_root(n)) {
                min_x = min_x.min(node.x);
                min_y = min_y.min(node.y);
            }
            Point::new(point.x - min_x, point.y - min_y)
        }
        None => Point::new(PASTE_NUDGE, PASTE_NUDGE),
    };

    let mut new_roots = Vec::new();

    for source in &payload.nodes {
        let id = mapping[&source.id].clone();
        let is_root = becomes_root(source);

        let (x, y) = if is_root {
            (source.x + offset.x, source.y + offset.y)
        } else {
            (source.x, source.y)
        };

        let node = Node {
            id: id.clone(),
            parent: if is_root {
                None
            } else {
                source.parent.as_ref().map(|p| mapping[p].clone())
            },
            children: source
                .children
                .iter()
                .filter_map(|c| mapping.get(c).cloned())
                .collect(),
            x,
            y,
            width: source.width,
            height: source.height,
            fixed_size: source.fixed_size,
            payload: source.payload.clone(),
        };

        draft.insert_node(node);
        if is_root {
            draft.add_root(&id);
            new_roots.push(id);
        }
    }

    new_roots
}
