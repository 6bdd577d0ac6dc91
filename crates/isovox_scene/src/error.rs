//! # Scene Error Types
//!
//! All errors that can occur while reading or writing a VOX scene.

use std::io;

use thiserror::Error;

/// Errors that can occur in the scene codec.
#[derive(Error, Debug)]
pub enum VoxError {
    /// The stream does not start with `"VOX "`.
    #[error("bad magic: expected 'VOX ', got '{}'", String::from_utf8_lossy(found))]
    BadMagic {
        /// The four bytes actually found.
        found: [u8; 4],
    },

    /// A read failed or the stream ended in the middle of a chunk.
    #[error("truncated stream: {0}")]
    TruncatedStream(#[source] io::Error),

    /// The declared file version is not supported.
    ///
    /// Declared for completeness; the parser records the version but does
    /// not check it.
    #[error("unsupported VOX version: {0}")]
    UnsupportedVersion(i32),

    /// A `SIZE` chunk declares an extent below 0 or above 256.
    #[error("invalid SIZE extents {0:?} (each must be within 0..=256)")]
    InvalidSize([i32; 3]),

    /// The grid is too large to be addressed with byte coordinates.
    #[error("grid of size {0} exceeds the maximum of 256")]
    GridTooLarge(usize),

    /// The output sink rejected a write.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Result type for scene operations.
pub type VoxResult<T> = Result<T, VoxError>;
