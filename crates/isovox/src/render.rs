//! Interfaces of the sprite back end.
//!
//! Rasterization, palette reduction and image encoding are provided by
//! callers; the pipeline only drives them.

use std::io::{self, Write};

use isovox_scene::Palette;
use isovox_slope::ClassifiedGrid;

/// An image of palette indices, row-major. Index 0 is transparent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexedImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl IndexedImage {
    /// Creates a fully transparent image.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`; 0 when out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    /// Sets a pixel. Out of bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, index: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = index;
        }
    }

    /// Pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Draws one view of a classified grid.
pub trait SpriteRenderer {
    /// Renders `grid` turned by `quarter_turns` clockwise quarter turns, at
    /// animation `frame`.
    fn render(
        &mut self,
        grid: &ClassifiedGrid,
        palette: &Palette,
        quarter_turns: u8,
        frame: u32,
    ) -> IndexedImage;
}

/// Maps rendered images onto a smaller palette.
pub trait PaletteReducer {
    /// Returns the remapped image and the palette it indexes.
    fn reduce(&mut self, image: &IndexedImage, palette: &Palette) -> (IndexedImage, Palette);
}

/// Writes images to an output format.
pub trait ImageEncoder {
    /// Encodes `frames` sharing `palette` into `out`.
    ///
    /// # Errors
    ///
    /// Any I/O error from `out`.
    fn encode(
        &mut self,
        frames: &[IndexedImage],
        palette: &Palette,
        out: &mut dyn Write,
    ) -> io::Result<()>;
}
