//! Cubic voxel grids.
//!
//! A grid is an `n × n × n` array of palette indices, stored X-major:
//! `cells[(x * n + y) * n + z]`. Index 0 is empty.

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::error::{VoxError, VoxResult};

/// Largest cube size accepted from input, per axis.
///
/// Matches the editor's model limit and keeps every cell addressable with
/// byte coordinates.
pub const MAX_GRID_SIZE: usize = 256;

/// A cubic grid of palette indices.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct VoxelGrid {
    size: usize,
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// Creates an empty grid with `size` cells per axis.
    ///
    /// Sizes taken from untrusted data go through [`VoxelGrid::try_new`].
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size * size],
        }
    }

    /// Creates an empty grid, rejecting sizes above [`MAX_GRID_SIZE`].
    ///
    /// # Errors
    ///
    /// `GridTooLarge` if `size` is over the limit.
    pub fn try_new(size: usize) -> VoxResult<Self> {
        let len = size
            .checked_mul(size)
            .and_then(|square| square.checked_mul(size))
            .filter(|_| size <= MAX_GRID_SIZE)
            .ok_or(VoxError::GridTooLarge(size))?;
        Ok(Self {
            size,
            cells: vec![0; len],
        })
    }

    /// Cells per axis.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Flat index of an in-bounds cell.
    #[inline]
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.size + y) * self.size + z
    }

    /// Flat index of a possibly out-of-bounds cell.
    #[inline]
    #[must_use]
    pub fn checked_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let n = self.size;
        let x = usize::try_from(x).ok().filter(|&v| v < n)?;
        let y = usize::try_from(y).ok().filter(|&v| v < n)?;
        let z = usize::try_from(z).ok().filter(|&v| v < n)?;
        Some(self.index(x, y, z))
    }

    /// Reads a cell. Out of bounds reads return 0.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u8 {
        self.checked_index(x, y, z).map_or(0, |i| self.cells[i])
    }

    /// Writes a cell. Out of bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, color: u8) {
        if let Some(i) = self.checked_index(x, y, z) {
            self.cells[i] = color;
        }
    }

    /// All cells in storage order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Cells as raw bytes, for upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable access to all cells.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Iterates over non-empty cells as `([x, y, z], color)`.
    pub fn iter_filled(&self) -> impl Iterator<Item = ([usize; 3], u8)> + '_ {
        let n = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(move |(i, &c)| ([i / (n * n), (i / n) % n, i % n], c))
    }
}

impl fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("size", &self.size)
            .field("filled", &self.filled_count())
            .finish()
    }
}

/// Axis-aligned integer bounding box, inclusive on both ends.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [i32; 3],
    /// Maximum corner.
    pub max: [i32; 3],
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// A box containing nothing; the identity for [`Bounds::include`].
    pub const EMPTY: Self = Self {
        min: [i32::MAX; 3],
        max: [i32::MIN; 3],
    };

    /// True if no point was ever included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|a| self.min[a] > self.max[a])
    }

    /// Grows the box to contain `point`.
    pub fn include(&mut self, point: [i32; 3]) {
        for a in 0..3 {
            self.min[a] = self.min[a].min(point[a]);
            self.max[a] = self.max[a].max(point[a]);
        }
    }

    /// Grows the box to contain `other`.
    pub fn union(&mut self, other: &Self) {
        if !other.is_empty() {
            self.include(other.min);
            self.include(other.max);
        }
    }

    /// Returns the box moved by `offset`, saturating at the `i32` range.
    /// Empty boxes stay empty.
    #[must_use]
    pub fn translated(&self, offset: [i32; 3]) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = *self;
        for a in 0..3 {
            out.min[a] = out.min[a].saturating_add(offset[a]);
            out.max[a] = out.max[a].saturating_add(offset[a]);
        }
        out
    }
}
