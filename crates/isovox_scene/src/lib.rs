//! # ISOVOX Scene
//!
//! Codec for MagicaVoxel-style chunked voxel scenes:
//! - Chunk decoding into a closed [`SceneChunk`] enum
//! - Scene reconstruction (grids, palette, materials, node graph)
//! - Flattening of the node graph into one cubic [`VoxelGrid`]
//! - A minimal single-grid writer
//!
//! ## Architecture Rules
//!
//! 1. **No global state** - every parse returns its own [`ParseResult`]
//! 2. **Fail whole** - a parse either returns a complete result or an error
//! 3. **Never panic on input** - out-of-bounds coordinates are dropped,
//!    oversized extents are errors, far-off placements are skipped
//!
//! ## Example
//!
//! ```rust,ignore
//! use isovox_scene::{flatten, parse_bytes, ParseMode};
//!
//! let parsed = parse_bytes(&bytes, ParseMode::Specialized)?;
//! let flat = flatten(&parsed.model);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod grid;
pub mod material;
pub mod palette;
pub mod parser;
pub mod writer;

pub use chunk::{ChunkReader, SceneChunk};
pub use error::{VoxError, VoxResult};
pub use flatten::{flatten, placements, Placement};
pub use graph::{
    Dict, GridLinks, GroupNode, LinkMarker, Model, Rotation, ShapeModel, ShapeNode, TransformNode,
};
pub use grid::{Bounds, VoxelGrid, MAX_GRID_SIZE};
pub use material::{Material, MaterialKind, MaterialTrait, Materials};
pub use palette::{Color, Palette, FALLBACK_PALETTE, PALETTE_SIZE};
pub use parser::{parse, parse_bytes, ParseMode, ParseResult, SceneBuilder, LINK_MASK};
pub use writer::{VoxWriter, DEFAULT_VERSION};
