//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("invalid document: {0}")]
    Invalid(#[from] mindloom_document::InvariantViolation),

    #[error("patch error: {0}")]
    Patch(#[from] crate::patch::PatchError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
