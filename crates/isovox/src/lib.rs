//! # ISOVOX
//!
//! Converts MagicaVoxel-style scenes into classified grids ready for an
//! isometric sprite renderer:
//! - TOML configuration ([`IsovoxConfig`])
//! - Load → flatten → classify → rotate ([`Pipeline`])
//! - Back-end interfaces ([`SpriteRenderer`], [`PaletteReducer`],
//!   [`ImageEncoder`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use isovox::{IsovoxConfig, Pipeline};
//!
//! let config = IsovoxConfig::from_file("isovox.toml")?;
//! let mut pipeline = Pipeline::new(config);
//! let source = pipeline.convert_file("ship.vox")?;
//! let sprites = pipeline.render_all(&source, &mut renderer, 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;

pub use config::{IsovoxConfig, ParseConfig, RenderConfig, WriteConfig};
pub use error::{IsovoxError, IsovoxResult};
pub use pipeline::{Pipeline, SpriteSource};
pub use render::{ImageEncoder, IndexedImage, PaletteReducer, SpriteRenderer};

pub use isovox_scene as scene;
pub use isovox_slope as slope;
