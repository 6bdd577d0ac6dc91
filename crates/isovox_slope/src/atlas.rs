//! Shape/side atlas.
//!
//! Every slope byte maps to a 4×4 sprite tile, row-major, top row first:
//! - [`SHAPES`]: lit intensity per pixel in `0.0..=4.0`; fractional values
//!   dither between the two neighboring intensities. [`TRANSPARENT`] marks an
//!   empty pixel.
//! - [`SIDES`]: face code per pixel ([`SIDE_NONE`], [`SIDE_EDGE`],
//!   [`SIDE_BRIGHT`], [`SIDE_DIM`]), used for outlines and to swap the lit
//!   and shaded halves when mirroring.
//!
//! Only the curated bytes below have a tile; everything else is transparent.
//! Tiles are written as text:
//!
//! | char | intensity | side   |
//! |------|-----------|--------|
//! | `.`  | 7.0       | none   |
//! | `T`  | 3.0       | edge   |
//! | `4`  | 4.0       | edge   |
//! | `o`  | 0.0       | edge   |
//! | `L`  | 2.0       | bright |
//! | `l`  | 2.5       | bright |
//! | `R`  | 1.0       | dim    |
//! | `r`  | 1.5       | dim    |

use crate::slope::Slope;

/// Intensity of an empty pixel.
pub const TRANSPARENT: f32 = 7.0;

/// Pixel not covered by the tile.
pub const SIDE_NONE: u8 = 0;
/// Pixel on a face that never faces the light; outline only.
pub const SIDE_EDGE: u8 = 1;
/// Pixel on the lit face.
pub const SIDE_BRIGHT: u8 = 2;
/// Pixel on the shaded face.
pub const SIDE_DIM: u8 = 3;

/// Pixels per tile.
pub const TILE: usize = 16;

const CURATED: [(u8, &[u8; TILE]); 25] = [
    // full block
    (0xFF, b".TT.TTTTLLRR.LR."),
    // ramps, high edge on one side
    (0x5F, b"T...TTl.LLlr.LR."),
    (0xCF, b"..TTl.4TLLrR.LR."),
    (0xAF, b"...T.rTTlrRR.LR."),
    (0x3F, b"TT..T4.rLlrR.LR."),
    (0xF5, b".TT.TTTT.lRR..r."),
    (0xFC, b".TT.TTTTLl.r.l.."),
    (0xFA, b".TT.TTTTLLr..l.."),
    (0xF3, b".TT.TTTTl.RR..R."),
    // wedges, one vertical edge cut
    (0x77, b".T..TTl.LLlr.L.."),
    (0xDD, b"..T.lTT.LLrR.LR."),
    (0xEE, b"..T..lTTlrRR..R."),
    (0xBB, b".T..TTr.LlRR.LR."),
    // blocks with one corner cut
    (0xFE, b".TT.TT4TlLRR.LR."),
    (0xFD, b".TT.4TTTLLrR.LR."),
    (0xFB, b".TT.TTT4LLRr.LR."),
    (0xF7, b".T4.TTTTLlRR.LR."),
    (0xEF, b".TT.TTTTLLRR.lR."),
    (0xDF, b".TT.TTTTLLRR.Lr."),
    (0xBF, b".TT.TTTTlLRR.LR."),
    (0x7F, b".TT.TTTTLLRr.LR."),
    // pyramids, one low corner
    (0x17, b"....T...Ll..oL.."),
    (0x2B, b"....o...lr..LR.."),
    (0x4D, b"......T...lR..Ro"),
    (0x8E, b".......o...r..rR"),
];

const fn intensity(c: u8) -> f32 {
    match c {
        b'T' => 3.0,
        b'4' => 4.0,
        b'o' => 0.0,
        b'L' => 2.0,
        b'l' => 2.5,
        b'R' => 1.0,
        b'r' => 1.5,
        _ => TRANSPARENT,
    }
}

const fn side(c: u8) -> u8 {
    match c {
        b'T' | b'4' | b'o' => SIDE_EDGE,
        b'L' | b'l' => SIDE_BRIGHT,
        b'R' | b'r' => SIDE_DIM,
        _ => SIDE_NONE,
    }
}

const fn build_shapes() -> [[f32; TILE]; 256] {
    let mut table = [[TRANSPARENT; TILE]; 256];
    let mut i = 0;
    while i < CURATED.len() {
        let (mask, tile) = CURATED[i];
        let mut p = 0;
        while p < TILE {
            table[mask as usize][p] = intensity(tile[p]);
            p += 1;
        }
        i += 1;
    }
    table
}

const fn build_sides() -> [[u8; TILE]; 256] {
    let mut table = [[SIDE_NONE; TILE]; 256];
    let mut i = 0;
    while i < CURATED.len() {
        let (mask, tile) = CURATED[i];
        let mut p = 0;
        while p < TILE {
            table[mask as usize][p] = side(tile[p]);
            p += 1;
        }
        i += 1;
    }
    table
}

/// Intensity tiles by slope byte.
pub static SHAPES: [[f32; TILE]; 256] = build_shapes();

/// Face-code tiles by slope byte.
pub static SIDES: [[u8; TILE]; 256] = build_sides();

/// True if `mask` has a hand-drawn tile.
#[must_use]
pub fn is_curated(mask: u8) -> bool {
    CURATED.iter().any(|&(m, _)| m == mask)
}

/// Intensity tile of a slope.
#[inline]
#[must_use]
pub fn shape(slope: Slope) -> &'static [f32; TILE] {
    &SHAPES[usize::from(slope.bits())]
}

/// Face-code tile of a slope.
#[inline]
#[must_use]
pub fn sides(slope: Slope) -> &'static [u8; TILE] {
    &SIDES[usize::from(slope.bits())]
}

/// [`SHAPES`] as raw bytes, for upload.
#[must_use]
pub fn shapes_as_bytes() -> &'static [u8] {
    bytemuck::cast_slice(SHAPES.as_slice())
}

/// [`SIDES`] as raw bytes, for upload.
#[must_use]
pub fn sides_as_bytes() -> &'static [u8] {
    bytemuck::cast_slice(SIDES.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::CW;

    fn is_transparent(tile: &[f32; TILE]) -> bool {
        tile.iter().all(|&v| v >= TRANSPARENT)
    }

    #[test]
    fn test_full_block_is_drawn() {
        assert!(is_curated(0xFF));
        assert!(!is_transparent(shape(Slope::Solid)));
        assert_eq!(shape(Slope::Solid), shape(Slope::Ramp(0xFF)));
    }

    #[test]
    fn test_uncurated_is_transparent() {
        for mask in 0..=255u8 {
            if !is_curated(mask) {
                assert!(is_transparent(&SHAPES[usize::from(mask)]), "{mask:#04x}");
                assert!(SIDES[usize::from(mask)].iter().all(|&s| s == SIDE_NONE));
            }
        }
        assert!(is_transparent(shape(Slope::Ramp(0))));
    }

    #[test]
    fn test_curated_tiles_are_consistent() {
        for &(mask, _) in &CURATED {
            let shape = &SHAPES[usize::from(mask)];
            let sides = &SIDES[usize::from(mask)];
            assert!(!is_transparent(shape), "{mask:#04x}");
            for p in 0..TILE {
                assert!(sides[p] <= SIDE_DIM);
                if sides[p] == SIDE_NONE {
                    assert!(shape[p] >= TRANSPARENT);
                } else {
                    assert!((0.0..=4.0).contains(&shape[p]));
                }
            }
        }
    }

    #[test]
    fn test_curated_set_is_closed_under_rotation() {
        for &(mask, _) in &CURATED {
            assert!(is_curated(CW[usize::from(mask)]), "{mask:#04x}");
        }
    }

    #[test]
    fn test_byte_views() {
        assert_eq!(shapes_as_bytes().len(), 256 * TILE * 4);
        assert_eq!(sides_as_bytes().len(), 256 * TILE);
    }
}
