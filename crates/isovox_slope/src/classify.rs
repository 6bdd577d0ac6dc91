//! Two-pass slope classification.
//!
//! **Pass 1** looks at the six direct neighbors of every empty cell in the
//! source grid. Each filled neighbor contributes the four corner bits of the
//! face it touches; five or more bits make a ramp, wedge or full block.
//!
//! **Pass 2** completes corners. An empty cell left over from pass 1 takes,
//! from every pass-1 neighbor, the corners that neighbor has on the shared
//! face, unless that face is already complete. Four bits are enough here.
//!
//! Source voxels come out as [`Slope::Solid`].

use isovox_scene::VoxelGrid;

use crate::grid::ClassifiedGrid;
use crate::slope::{Slope, DIRECTIONS, FACE_BITS, SOLID_BYTE};

/// Minimum corner count for a pass-1 shape.
pub const PASS1_MIN_BITS: u32 = 5;

/// Minimum corner count for a pass-2 shape.
pub const PASS2_MIN_BITS: u32 = 4;

/// Bit distance between a face and the opposite face, per axis.
const FACE_SHIFT: [u32; 6] = [1, 2, 4, 1, 2, 4];

/// Picks the cell color from its neighbors' colors, in direction order.
///
/// The first pair of directions sharing a non-zero color wins; without a
/// pair, the first non-zero color.
#[must_use]
pub fn pick_color(neighbors: &[u8; 6]) -> u8 {
    for (i, &color) in neighbors.iter().enumerate() {
        if color != 0 && neighbors[i + 1..].contains(&color) {
            return color;
        }
    }
    neighbors.iter().copied().find(|&c| c != 0).unwrap_or(0)
}

/// Reusable classifier with its own pass-1 scratch buffers.
#[derive(Debug, Default)]
pub struct Classifier {
    colors: Vec<u8>,
    slopes: Vec<u8>,
}

impl Classifier {
    /// Creates a classifier with empty scratch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `grid` into a fresh grid.
    #[must_use]
    pub fn classify(&mut self, grid: &VoxelGrid) -> ClassifiedGrid {
        let mut out = ClassifiedGrid::new(grid.size());
        self.classify_into(grid, &mut out);
        out
    }

    /// Classifies `grid` into `out`, which is resized to match.
    pub fn classify_into(&mut self, grid: &VoxelGrid, out: &mut ClassifiedGrid) {
        let n = grid.size();
        out.reset(n);
        self.colors.clear();
        self.colors.resize(grid.cells().len(), 0);
        self.slopes.clear();
        self.slopes.resize(grid.cells().len(), 0);

        self.first_pass(grid);

        let mut ramps = 0usize;
        let mut corners = 0usize;
        for (i, [x, y, z]) in cells(n) {
            let source = grid.cells()[i];
            if source != 0 {
                out.set_index(i, source, Slope::Solid);
            } else if self.colors[i] != 0 {
                out.set_index(i, self.colors[i], Slope::Ramp(self.slopes[i]));
                ramps += 1;
            } else if let Some((color, mask)) = self.complete_corner(grid, [x, y, z]) {
                out.set_index(i, color, Slope::Ramp(mask));
                corners += 1;
            }
        }

        tracing::debug!(
            "classified size {}: {} solid, {} ramps, {} corners",
            n,
            grid.filled_count(),
            ramps,
            corners
        );
    }

    fn first_pass(&mut self, grid: &VoxelGrid) {
        for (i, [x, y, z]) in cells(grid.size()) {
            let source = grid.cells()[i];
            if source != 0 {
                self.colors[i] = source;
                self.slopes[i] = SOLID_BYTE;
                continue;
            }

            let mut neighbors = [0u8; 6];
            let mut mask = 0u8;
            for (d, [dx, dy, dz]) in DIRECTIONS.iter().enumerate() {
                neighbors[d] = grid.get(x + dx, y + dy, z + dz);
                if neighbors[d] != 0 {
                    mask |= FACE_BITS[d];
                }
            }
            if mask.count_ones() >= PASS1_MIN_BITS {
                self.colors[i] = pick_color(&neighbors);
                self.slopes[i] = mask;
            }
        }
    }

    fn complete_corner(&self, grid: &VoxelGrid, [x, y, z]: [i32; 3]) -> Option<(u8, u8)> {
        let mut neighbors = [0u8; 6];
        let mut mask = 0u8;
        for (d, [dx, dy, dz]) in DIRECTIONS.iter().enumerate() {
            let Some(j) = grid.checked_index(x + dx, y + dy, z + dz) else {
                continue;
            };
            neighbors[d] = self.colors[j];
            if neighbors[d] == 0 {
                continue;
            }
            // The neighbor's face towards this cell.
            let shared_face = FACE_BITS[(d + 3) % 6];
            let shared = self.slopes[j] & shared_face;
            if shared != shared_face {
                mask |= if d < 3 {
                    shared >> FACE_SHIFT[d]
                } else {
                    shared << FACE_SHIFT[d]
                };
            }
        }
        (mask.count_ones() >= PASS2_MIN_BITS).then(|| (pick_color(&neighbors), mask))
    }
}

/// Every cell of an `n`-cube as `(flat index, [x, y, z])`, in storage order.
fn cells(n: usize) -> impl Iterator<Item = (usize, [i32; 3])> {
    let side = i32::try_from(n).unwrap_or(0);
    (0..side)
        .flat_map(move |x| (0..side).flat_map(move |y| (0..side).map(move |z| [x, y, z])))
        .enumerate()
}

/// Classifies `grid` with a one-off [`Classifier`].
#[must_use]
pub fn classify(grid: &VoxelGrid) -> ClassifiedGrid {
    Classifier::new().classify(grid)
}
