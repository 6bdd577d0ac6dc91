//! Quarter-turn tables for slope bytes.
//!
//! A turn moves the corner at `(x, y)` to `(y, 1 - x)` on both z layers, so
//! the same 4-bit permutation applies to the low (z = 0) and high (z = 1)
//! nibble.

/// Clockwise quarter turn of the four corners in one z layer.
pub const ROTATE_NIBBLE: [u8; 16] = [0, 4, 1, 5, 8, 12, 9, 13, 2, 6, 3, 7, 10, 14, 11, 15];

const fn build_cw() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 0;
    while b < 256 {
        table[b] = (ROTATE_NIBBLE[b >> 4] << 4) | ROTATE_NIBBLE[b & 0x0F];
        b += 1;
    }
    table
}

const fn compose(first: &[u8; 256], then: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 0;
    while b < 256 {
        table[b] = then[first[b] as usize];
        b += 1;
    }
    table
}

const CW_TABLE: [u8; 256] = build_cw();

/// 90° clockwise.
pub static CW: [u8; 256] = CW_TABLE;

/// 180°.
pub static FLIP: [u8; 256] = compose(&CW_TABLE, &CW_TABLE);

/// 270° clockwise.
pub static CCW: [u8; 256] = compose(&compose(&CW_TABLE, &CW_TABLE), &CW_TABLE);

/// Table for `turns` clockwise quarter turns (mod 4). `None` means identity.
#[must_use]
pub fn table(turns: u8) -> Option<&'static [u8; 256]> {
    match turns % 4 {
        1 => Some(&CW),
        2 => Some(&FLIP),
        3 => Some(&CCW),
        _ => None,
    }
}

/// Rotates a slope byte by `turns` clockwise quarter turns.
#[inline]
#[must_use]
pub fn rotate(bits: u8, turns: u8) -> u8 {
    table(turns).map_or(bits, |t| t[usize::from(bits)])
}
