//! # Mindloom Document Model
//!
//! Canonical data model for a mindloom canvas document: a forest of
//! hierarchical nodes plus free-floating nodes and manual cross-links.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: nodes + roots + edges             │
//! │  - Node envelope with tagged payload union  │
//! │  - Ordered children (sibling display order) │
//! │  - Manual edges (non-structural links)      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ layout: document → positioned canvas view   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: transactions, undo/redo, clipboard  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single source of truth**: the `Document` owns every node and edge
//! 2. **Structural links are derived**: parent→child edges come from
//!    `children`, never from the edge list
//! 3. **All writes funnel through the editor**: consumers hold read-only
//!    snapshots valid until the next transaction

pub mod document;
pub mod edge;
pub mod file;
pub mod node;

pub use document::{Document, InvariantViolation};
pub use edge::{Edge, EdgeId};
pub use file::DocumentFile;
pub use node::{Node, NodeId, NodePayload};
