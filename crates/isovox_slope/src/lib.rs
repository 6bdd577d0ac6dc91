//! # ISOVOX Slope
//!
//! Turns a flat voxel grid into something an isometric sprite renderer can
//! draw: every source voxel stays a full block, and empty cells on the
//! border get a corner mask (ramp, wedge, pyramid) chosen from their
//! neighbors.
//!
//! ## Architecture Rules
//!
//! 1. **Pure** - classification depends only on the input grid
//! 2. **Compile-time tables** - rotation tables and the atlas are `static`
//! 3. **Caller-owned scratch** - reuse a [`Classifier`] across frames
//!
//! ## Example
//!
//! ```rust,ignore
//! use isovox_slope::{classify, rotate_clockwise};
//!
//! let classified = classify(&flat);
//! let quarter = rotate_clockwise(&classified);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod atlas;
pub mod classify;
pub mod grid;
pub mod rotation;
pub mod slope;

pub use atlas::{is_curated, SHAPES, SIDES};
pub use classify::{classify, pick_color, Classifier};
pub use grid::{rotate_clockwise, ClassifiedGrid};
pub use rotation::{CCW, CW, FLIP, ROTATE_NIBBLE};
pub use slope::{Slope, DIRECTIONS, FACE_BITS};
