mod inspect;
mod layout;
mod stats;

pub use inspect::{inspect, InspectArgs};
pub use layout::{layout, LayoutArgs};
pub use stats::{stats, StatsArgs};

use anyhow::{Context, Result};
use mindloom_document::{Document, DocumentFile};
use std::path::Path;

/// Load and validate a saved document
pub(crate) fn load_document(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file: DocumentFile =
        serde_json::from_str(&json).with_context(|| format!("cannot parse {}", path.display()))?;
    let doc = file
        .into_document()
        .with_context(|| format!("{} is not a consistent document", path.display()))?;
    Ok(doc)
}
