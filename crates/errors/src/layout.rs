//! Layout resolver error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutError {
    #[error("unrecognized scheme segment {segment:?} in {path}")]
    InvalidScheme { path: String, segment: String },
}
