//! Install record error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordError {
    #[error("record not found: {path}")]
    NotFound { path: String },

    #[error("malformed record content at line {line}: {message}")]
    Parse { line: usize, message: String },
}
