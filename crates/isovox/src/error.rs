//! # Pipeline Error Types

use std::io;
use std::path::PathBuf;

use isovox_scene::VoxError;
use thiserror::Error;

/// Errors raised by the conversion pipeline.
#[derive(Error, Debug)]
pub enum IsovoxError {
    /// The scene could not be decoded or encoded.
    #[error(transparent)]
    Vox(#[from] VoxError),

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pipeline operations.
pub type IsovoxResult<T> = Result<T, IsovoxError>;
