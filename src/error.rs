use thiserror::Error;

use crate::models::DocId;

/// Main error type for ferret operations
#[derive(Error, Debug)]
pub enum FerretError {
    #[error("malformed index data at offset {offset}: {reason}")]
    MalformedInput { offset: usize, reason: String },

    #[error("seek out of bounds: offset {offset}, blob length {len}")]
    OutOfBounds { offset: usize, len: usize },

    #[error("content extraction failed: {0}")]
    Extraction(String),

    #[error("invalid document id {0}: ids must be strictly positive")]
    InvalidDocumentId(i64),

    #[error("duplicate document id {0}")]
    DuplicateId(DocId),

    #[error("end of node data")]
    Exhausted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ferret operations
pub type Result<T> = std::result::Result<T, FerretError>;

impl FerretError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        FerretError::MalformedInput {
            offset,
            reason: reason.into(),
        }
    }

    /// Check if this error is a decode failure that sinks a reader cursor
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            FerretError::MalformedInput { .. } | FerretError::OutOfBounds { .. }
        )
    }
}
