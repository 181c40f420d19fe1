//! Error types for quadedit.

use thiserror::Error;

/// The main error type for quadedit operations.
#[derive(Error, Debug)]
pub enum QuadEditError {
    /// A face was built or re-vertexed with a vertex count other than four.
    #[error("a face must have exactly {expected} vertices, got {actual}")]
    InvalidTopology { expected: usize, actual: usize },

    /// An operation needed a selected face but nothing is selected.
    #[error("no face is selected")]
    NoSelection,

    /// A vertex slot outside `0..4` was addressed.
    #[error("vertex index {0} out of range for a quad face")]
    VertexIndexOutOfRange(usize),

    /// Relative coordinates were requested without a reference point.
    #[error("relative coordinate mode requires a reference point")]
    MissingReferencePoint,

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for quadedit operations.
pub type Result<T> = std::result::Result<T, QuadEditError>;
