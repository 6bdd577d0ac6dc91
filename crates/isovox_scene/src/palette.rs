//! 256-entry RGBA palette.
//!
//! Colors are packed canonically as `0xRRGGBBAA`. Index 0 is transparent and
//! never carries a real color.

use bytemuck::{Pod, Zeroable};

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 256;

/// Stock MagicaVoxel palette, packed little-endian as it appears in memory
/// after reading a file's `RGBA` chunk naively (`0xAABBGGRR`).
const STOCK_ABGR: [u32; PALETTE_SIZE] = [
    0x00000000, 0xffffffff, 0xffccffff, 0xff99ffff, 0xff66ffff, 0xff33ffff, 0xff00ffff, 0xffffccff,
    0xffccccff, 0xff99ccff, 0xff66ccff, 0xff33ccff, 0xff00ccff, 0xffff99ff, 0xffcc99ff, 0xff9999ff,
    0xff6699ff, 0xff3399ff, 0xff0099ff, 0xffff66ff, 0xffcc66ff, 0xff9966ff, 0xff6666ff, 0xff3366ff,
    0xff0066ff, 0xffff33ff, 0xffcc33ff, 0xff9933ff, 0xff6633ff, 0xff3333ff, 0xff0033ff, 0xffff00ff,
    0xffcc00ff, 0xff9900ff, 0xff6600ff, 0xff3300ff, 0xff0000ff, 0xffffffcc, 0xffccffcc, 0xff99ffcc,
    0xff66ffcc, 0xff33ffcc, 0xff00ffcc, 0xffffcccc, 0xffcccccc, 0xff99cccc, 0xff66cccc, 0xff33cccc,
    0xff00cccc, 0xffff99cc, 0xffcc99cc, 0xff9999cc, 0xff6699cc, 0xff3399cc, 0xff0099cc, 0xffff66cc,
    0xffcc66cc, 0xff9966cc, 0xff6666cc, 0xff3366cc, 0xff0066cc, 0xffff33cc, 0xffcc33cc, 0xff9933cc,
    0xff6633cc, 0xff3333cc, 0xff0033cc, 0xffff00cc, 0xffcc00cc, 0xff9900cc, 0xff6600cc, 0xff3300cc,
    0xff0000cc, 0xffffff99, 0xffccff99, 0xff99ff99, 0xff66ff99, 0xff33ff99, 0xff00ff99, 0xffffcc99,
    0xffcccc99, 0xff99cc99, 0xff66cc99, 0xff33cc99, 0xff00cc99, 0xffff9999, 0xffcc9999, 0xff999999,
    0xff669999, 0xff339999, 0xff009999, 0xffff6699, 0xffcc6699, 0xff996699, 0xff666699, 0xff336699,
    0xff006699, 0xffff3399, 0xffcc3399, 0xff993399, 0xff663399, 0xff333399, 0xff003399, 0xffff0099,
    0xffcc0099, 0xff990099, 0xff660099, 0xff330099, 0xff000099, 0xffffff66, 0xffccff66, 0xff99ff66,
    0xff66ff66, 0xff33ff66, 0xff00ff66, 0xffffcc66, 0xffcccc66, 0xff99cc66, 0xff66cc66, 0xff33cc66,
    0xff00cc66, 0xffff9966, 0xffcc9966, 0xff999966, 0xff669966, 0xff339966, 0xff009966, 0xffff6666,
    0xffcc6666, 0xff996666, 0xff666666, 0xff336666, 0xff006666, 0xffff3366, 0xffcc3366, 0xff993366,
    0xff663366, 0xff333366, 0xff003366, 0xffff0066, 0xffcc0066, 0xff990066, 0xff660066, 0xff330066,
    0xff000066, 0xffffff33, 0xffccff33, 0xff99ff33, 0xff66ff33, 0xff33ff33, 0xff00ff33, 0xffffcc33,
    0xffcccc33, 0xff99cc33, 0xff66cc33, 0xff33cc33, 0xff00cc33, 0xffff9933, 0xffcc9933, 0xff999933,
    0xff669933, 0xff339933, 0xff009933, 0xffff6633, 0xffcc6633, 0xff996633, 0xff666633, 0xff336633,
    0xff006633, 0xffff3333, 0xffcc3333, 0xff993333, 0xff663333, 0xff333333, 0xff003333, 0xffff0033,
    0xffcc0033, 0xff990033, 0xff660033, 0xff330033, 0xff000033, 0xffffff00, 0xffccff00, 0xff99ff00,
    0xff66ff00, 0xff33ff00, 0xff00ff00, 0xffffcc00, 0xffcccc00, 0xff99cc00, 0xff66cc00, 0xff33cc00,
    0xff00cc00, 0xffff9900, 0xffcc9900, 0xff999900, 0xff669900, 0xff339900, 0xff009900, 0xffff6600,
    0xffcc6600, 0xff996600, 0xff666600, 0xff336600, 0xff006600, 0xffff3300, 0xffcc3300, 0xff993300,
    0xff663300, 0xff333300, 0xff003300, 0xffff0000, 0xffcc0000, 0xff990000, 0xff660000, 0xff330000,
    0xff0000ee, 0xff0000dd, 0xff0000bb, 0xff0000aa, 0xff000088, 0xff000077, 0xff000055, 0xff000044,
    0xff000022, 0xff000011, 0xff00ee00, 0xff00dd00, 0xff00bb00, 0xff00aa00, 0xff008800, 0xff007700,
    0xff005500, 0xff004400, 0xff002200, 0xff001100, 0xffee0000, 0xffdd0000, 0xffbb0000, 0xffaa0000,
    0xff880000, 0xff770000, 0xff550000, 0xff440000, 0xff220000, 0xff110000, 0xffeeeeee, 0xffdddddd,
    0xffbbbbbb, 0xffaaaaaa, 0xff888888, 0xff777777, 0xff555555, 0xff444444, 0xff222222, 0xff111111,
];

const fn repack_stock() -> [u32; PALETTE_SIZE] {
    let mut out = [0u32; PALETTE_SIZE];
    let mut i = 0;
    while i < PALETTE_SIZE {
        out[i] = STOCK_ABGR[i].swap_bytes();
        i += 1;
    }
    out
}

/// Fallback palette in canonical `0xRRGGBBAA` order.
///
/// Used when a file carries no `RGBA` chunk and to pad short palettes on
/// write.
pub static FALLBACK_PALETTE: [u32; PALETTE_SIZE] = repack_stock();

/// Unpacked color entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255).
    pub a: u8,
}

impl Color {
    /// Unpacks a canonical `0xRRGGBBAA` value.
    #[inline]
    #[must_use]
    pub const fn from_rgba(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Packs back to `0xRRGGBBAA`.
    #[inline]
    #[must_use]
    pub const fn to_rgba(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Returns approximate brightness (0.0 - 1.0).
    #[inline]
    #[must_use]
    pub fn brightness(&self) -> f32 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b)) / 255.0
    }
}

/// A 256-color palette.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Palette {
    colors: [u32; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::fallback()
    }
}

impl Palette {
    /// The stock fallback palette.
    #[must_use]
    pub fn fallback() -> Self {
        Self { colors: FALLBACK_PALETTE }
    }

    /// Builds a palette from a possibly short list, padding missing entries
    /// from [`FALLBACK_PALETTE`]. Index 0 is always transparent.
    #[must_use]
    pub fn from_slice(colors: &[u32]) -> Self {
        let mut palette = Self::fallback();
        for (slot, &color) in palette.colors.iter_mut().zip(colors).skip(1) {
            *slot = color;
        }
        palette.colors[0] = 0;
        palette
    }

    /// Gets the packed color at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u8) -> u32 {
        self.colors[usize::from(index)]
    }

    /// Gets the unpacked color at `index`.
    #[inline]
    #[must_use]
    pub fn color(&self, index: u8) -> Color {
        Color::from_rgba(self.get(index))
    }

    /// Sets the packed color at `index`.
    pub fn set(&mut self, index: u8, rgba: u32) {
        self.colors[usize::from(index)] = rgba;
    }

    /// All 256 entries.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.colors
    }

    /// Raw bytes for upload to a renderer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_unpack() {
        let color = Color::from_rgba(0x1122_33FF);
        assert_eq!(color.r, 0x11);
        assert_eq!(color.g, 0x22);
        assert_eq!(color.b, 0x33);
        assert_eq!(color.a, 0xFF);
        assert_eq!(color.to_rgba(), 0x1122_33FF);
    }

    #[test]
    fn test_fallback_palette() {
        let palette = Palette::fallback();
        // Index 0 should be transparent
        assert_eq!(palette.color(0).a, 0);
        // Index 1 should be white
        assert_eq!(palette.get(1), 0xFFFF_FFFF);
        // Index 2 is a pale yellow in the stock palette
        assert_eq!(palette.color(2), Color { r: 0xFF, g: 0xFF, b: 0xCC, a: 0xFF });
    }

    #[test]
    fn test_from_slice_pads_from_fallback() {
        let palette = Palette::from_slice(&[0xDEAD_BEEF, 0x1234_5678, 0x9ABC_DEF0]);
        assert_eq!(palette.get(0), 0);
        assert_eq!(palette.get(1), 0x1234_5678);
        assert_eq!(palette.get(2), 0x9ABC_DEF0);
        assert_eq!(palette.get(3), FALLBACK_PALETTE[3]);
        assert_eq!(palette.get(255), FALLBACK_PALETTE[255]);
    }

    #[test]
    fn test_palette_bytes() {
        assert_eq!(Palette::fallback().as_bytes().len(), PALETTE_SIZE * 4);
    }

    #[test]
    fn test_color_brightness() {
        let white = Color { r: 255, g: 255, b: 255, a: 255 };
        let black = Color { r: 0, g: 0, b: 0, a: 255 };

        assert!(white.brightness() > 0.9);
        assert!(black.brightness() < 0.1);
    }
}
