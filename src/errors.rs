use std::io;

use thiserror::Error;

use crate::types::PathString;

/// Error type for dataset construction, item access, and snapshot persistence.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Invalid configuration or unusable dataset layout.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// An item loader failed for one path.
    #[error("failed to load item '{path}': {reason}")]
    ItemLoad {
        /// Path handed to the loader.
        path: PathString,
        /// Loader-provided failure description.
        reason: String,
    },
    /// Random access past the end of a dataset.
    #[error("index {index} is out of range for dataset of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Dataset length.
        len: usize,
    },
    /// Snapshot record could not be decoded or verified.
    #[error("pair index snapshot failure: {0}")]
    Persistence(String),
    /// Filesystem failure, including unreadable directories during a scan.
    #[error(transparent)]
    Io(#[from] io::Error),
}
