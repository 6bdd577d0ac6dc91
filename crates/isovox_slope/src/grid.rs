//! Classified grids: a color and a slope per cell.

use isovox_scene::VoxelGrid;

use crate::slope::Slope;

/// Output of the classifier, same layout as [`VoxelGrid`].
///
/// A cell with color 0 is never drawn and always reads back as `Ramp(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifiedGrid {
    size: usize,
    colors: Vec<u8>,
    slopes: Vec<Slope>,
}

impl ClassifiedGrid {
    /// Creates a grid where nothing is drawn.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let len = size * size * size;
        Self {
            size,
            colors: vec![0; len],
            slopes: vec![Slope::default(); len],
        }
    }

    /// Cells per axis.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True for a zero-sized grid.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.size + y) * self.size + z
    }

    #[inline]
    fn checked_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let n = self.size;
        let x = usize::try_from(x).ok().filter(|&v| v < n)?;
        let y = usize::try_from(y).ok().filter(|&v| v < n)?;
        let z = usize::try_from(z).ok().filter(|&v| v < n)?;
        Some(self.index(x, y, z))
    }

    /// Color of a cell; 0 when out of bounds.
    #[inline]
    #[must_use]
    pub fn color(&self, x: i32, y: i32, z: i32) -> u8 {
        self.checked_index(x, y, z).map_or(0, |i| self.colors[i])
    }

    /// Slope of a cell; `Ramp(0)` when out of bounds or not drawn.
    #[inline]
    #[must_use]
    pub fn slope(&self, x: i32, y: i32, z: i32) -> Slope {
        match self.checked_index(x, y, z) {
            Some(i) if self.colors[i] != 0 => self.slopes[i],
            _ => Slope::default(),
        }
    }

    /// Packed slope byte of a cell, `0xFF` for solid cells.
    #[inline]
    #[must_use]
    pub fn packed_slope(&self, x: i32, y: i32, z: i32) -> u8 {
        self.slope(x, y, z).bits()
    }

    /// Sets a cell. Out of bounds writes are ignored; a color of 0 clears
    /// the slope.
    pub fn set(&mut self, x: i32, y: i32, z: i32, color: u8, slope: Slope) {
        if let Some(i) = self.checked_index(x, y, z) {
            self.colors[i] = color;
            self.slopes[i] = if color == 0 { Slope::default() } else { slope };
        }
    }

    #[inline]
    pub(crate) fn set_index(&mut self, i: usize, color: u8, slope: Slope) {
        self.colors[i] = color;
        self.slopes[i] = if color == 0 { Slope::default() } else { slope };
    }

    /// Resizes to `size` and clears every cell, keeping the allocation.
    pub fn reset(&mut self, size: usize) {
        let len = size * size * size;
        self.size = size;
        self.colors.clear();
        self.colors.resize(len, 0);
        self.slopes.clear();
        self.slopes.resize(len, Slope::default());
    }

    /// Colors in storage order.
    #[must_use]
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    /// Slopes in storage order.
    #[must_use]
    pub fn slopes(&self) -> &[Slope] {
        &self.slopes
    }

    /// Colors as raw bytes, for upload.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        &self.colors
    }

    /// Packed slope bytes in storage order.
    #[must_use]
    pub fn slope_bytes(&self) -> Vec<u8> {
        self.colors
            .iter()
            .zip(&self.slopes)
            .map(|(&c, s)| if c == 0 { 0 } else { s.bits() })
            .collect()
    }

    /// Number of drawn cells.
    #[must_use]
    pub fn drawn_count(&self) -> usize {
        self.colors.iter().filter(|&&c| c != 0).count()
    }

    /// The source voxels: colors of solid cells, everything else empty.
    ///
    /// Classifying the projection reproduces this grid.
    #[must_use]
    pub fn solid_projection(&self) -> VoxelGrid {
        let mut grid = VoxelGrid::new(self.size);
        let cells = grid.cells_mut().iter_mut();
        for ((cell, &color), slope) in cells.zip(&self.colors).zip(&self.slopes) {
            if slope.is_solid() {
                *cell = color;
            }
        }
        grid
    }

    /// Turns the grid 90° clockwise about the vertical axis.
    ///
    /// Each layer is rotated by cycling the four cells of every orbit,
    /// `(x, y) → (y, n-1-x) → (n-1-x, n-1-y) → (n-1-y, x)`; slopes are
    /// turned with them.
    pub fn rotate_clockwise_in_place(&mut self) {
        let n = self.size;
        if n == 0 {
            return;
        }
        let last = n - 1;
        for z in 0..n {
            for x in 0..n / 2 {
                for y in 0..(n + 1) / 2 {
                    let a = self.index(x, y, z);
                    let b = self.index(y, last - x, z);
                    let c = self.index(last - x, last - y, z);
                    let d = self.index(last - y, x, z);

                    let color = self.colors[d];
                    self.colors[d] = self.colors[c];
                    self.colors[c] = self.colors[b];
                    self.colors[b] = self.colors[a];
                    self.colors[a] = color;

                    let slope = self.slopes[d];
                    self.slopes[d] = self.slopes[c].rotated_cw();
                    self.slopes[c] = self.slopes[b].rotated_cw();
                    self.slopes[b] = self.slopes[a].rotated_cw();
                    self.slopes[a] = slope.rotated_cw();
                }
            }
            if n % 2 == 1 {
                let center = self.index(n / 2, n / 2, z);
                self.slopes[center] = self.slopes[center].rotated_cw();
            }
        }
    }
}

/// Returns `grid` turned 90° clockwise.
#[must_use]
pub fn rotate_clockwise(grid: &ClassifiedGrid) -> ClassifiedGrid {
    let mut out = grid.clone();
    out.rotate_clockwise_in_place();
    out
}
