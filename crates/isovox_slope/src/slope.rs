//! Slope values.
//!
//! A slope byte has one bit per corner of the unit cube, `bit = x + 2y + 4z`.
//! Each of the six faces owns the four corners lying on it:
//!
//! ```text
//! -X 0x55   -Y 0x33   -Z 0x0F
//! +X 0xAA   +Y 0xCC   +Z 0xF0
//! ```

use crate::rotation::CW;

/// Neighbor directions in scan order.
pub const DIRECTIONS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
];

/// Corner bits of the face towards each direction, parallel to [`DIRECTIONS`].
pub const FACE_BITS: [u8; 6] = [0x55, 0x33, 0x0F, 0xAA, 0xCC, 0xF0];

/// Packed value of a solid cell.
pub const SOLID_BYTE: u8 = 0xFF;

/// Render shape of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slope {
    /// A voxel from the source grid, drawn as a full block.
    Solid,
    /// An empty border cell filled by the given corner mask. `Ramp(0)` draws
    /// nothing.
    Ramp(u8),
}

impl Default for Slope {
    fn default() -> Self {
        Self::Ramp(0)
    }
}

impl Slope {
    /// Packed byte for the atlas and the sprite renderer.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Solid => SOLID_BYTE,
            Self::Ramp(mask) => mask,
        }
    }

    /// True for source voxels.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }

    /// True if the cell draws nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Ramp(0))
    }

    /// Slope after a 90° clockwise turn about the vertical axis.
    #[inline]
    #[must_use]
    pub fn rotated_cw(self) -> Self {
        match self {
            Self::Solid => Self::Solid,
            Self::Ramp(mask) => Self::Ramp(CW[usize::from(mask)]),
        }
    }
}
