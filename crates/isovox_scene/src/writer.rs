//! Minimal VOX container writer.
//!
//! ```text
//! "VOX " | version
//! MAIN (content 0, children = everything below)
//! ├── SIZE  n n n
//! ├── XYZI  sparse, color 0 skipped
//! ├── RGBA  255 colors + 1 reserved entry
//! └── MATL* one per non-empty material
//! ```

use std::io::Write;

use crate::chunk::{RGBA_ENTRIES, VOX_MAGIC};
use crate::error::{VoxError, VoxResult};
use crate::grid::{VoxelGrid, MAX_GRID_SIZE};
use crate::material::{Material, Materials};
use crate::palette::FALLBACK_PALETTE;

/// Version written by default.
pub const DEFAULT_VERSION: i32 = 150;

/// Largest grid addressable with byte coordinates.
pub const MAX_WRITE_SIZE: usize = MAX_GRID_SIZE;

/// Writes single-grid VOX containers.
#[derive(Debug, Clone, Copy)]
pub struct VoxWriter {
    version: i32,
}

impl Default for VoxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION)
    }
}

impl VoxWriter {
    /// Creates a writer stamping `version` into the header.
    #[must_use]
    pub const fn new(version: i32) -> Self {
        Self { version }
    }

    /// Serializes `grid` with its palette and materials.
    ///
    /// `palette[i]` is the `0xRRGGBBAA` color of index `i`; entries past the
    /// end of a short palette come from the fallback palette.
    ///
    /// # Errors
    ///
    /// `GridTooLarge` if the grid exceeds 256 cells per axis, `Write` if the
    /// sink fails.
    pub fn write<W: Write>(
        &self,
        mut out: W,
        grid: &VoxelGrid,
        palette: &[u32],
        materials: &Materials,
    ) -> VoxResult<()> {
        let bytes = self.to_bytes(grid, palette, materials)?;
        out.write_all(&bytes).map_err(VoxError::Write)?;
        out.flush().map_err(VoxError::Write)
    }

    /// Serializes into a fresh buffer.
    ///
    /// # Errors
    ///
    /// `GridTooLarge` if the grid exceeds 256 cells per axis.
    pub fn to_bytes(
        &self,
        grid: &VoxelGrid,
        palette: &[u32],
        materials: &Materials,
    ) -> VoxResult<Vec<u8>> {
        let size = grid.size();
        if size > MAX_WRITE_SIZE {
            return Err(VoxError::GridTooLarge(size));
        }
        let extent = to_i32(size);

        let mut children = Vec::new();
        push_chunk(&mut children, b"SIZE", &ints(&[extent, extent, extent]));
        push_chunk(&mut children, b"XYZI", &xyzi_content(grid));
        push_chunk(&mut children, b"RGBA", &rgba_content(palette));
        for (&id, material) in materials {
            if !material.is_empty() {
                push_chunk(&mut children, b"MATL", &matl_content(id, material));
            }
        }

        let mut out = Vec::with_capacity(children.len() + 20);
        out.extend_from_slice(&VOX_MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(b"MAIN");
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&to_i32(children.len()).to_le_bytes());
        out.extend_from_slice(&children);

        tracing::debug!("wrote VOX container: {} bytes, grid size {}", out.len(), size);
        Ok(out)
    }
}

fn to_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn push_chunk(buf: &mut Vec<u8>, id: &[u8; 4], content: &[u8]) {
    buf.extend_from_slice(id);
    buf.extend_from_slice(&to_i32(content.len()).to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(content);
}

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&to_i32(s.len()).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

#[allow(clippy::cast_possible_truncation)]
fn xyzi_content(grid: &VoxelGrid) -> Vec<u8> {
    let filled = grid.filled_count();
    let mut content = Vec::with_capacity(4 + filled * 4);
    content.extend_from_slice(&to_i32(filled).to_le_bytes());
    // Coordinates fit in a byte: the caller checked size <= 256.
    for ([x, y, z], color) in grid.iter_filled() {
        content.extend_from_slice(&[x as u8, y as u8, z as u8, color]);
    }
    content
}

fn rgba_content(palette: &[u32]) -> Vec<u8> {
    let mut content = Vec::with_capacity((RGBA_ENTRIES + 1) * 4);
    for index in 1..=RGBA_ENTRIES {
        let color = palette.get(index).copied().unwrap_or(FALLBACK_PALETTE[index]);
        content.extend_from_slice(&color.to_be_bytes());
    }
    content.extend_from_slice(&[0; 4]);
    content
}

fn matl_content(id: i32, material: &Material) -> Vec<u8> {
    let mut content = ints(&[id, to_i32(material.traits.len() + 1)]);
    push_string(&mut content, "_type");
    push_string(&mut content, material.kind.key());
    for (t, value) in &material.traits {
        push_string(&mut content, t.key());
        push_string(&mut content, &value.to_string());
    }
    content
}
