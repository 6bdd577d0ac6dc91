//! Scene flattening: composites every placed shape into one cubic grid.

use crate::graph::Model;
use crate::grid::{VoxelGrid, MAX_GRID_SIZE};

/// One grid resolved through the scene graph.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    /// Rounded first-frame translation of the owning transform.
    pub translation: [i32; 3],
    /// Source grid.
    pub grid: &'a VoxelGrid,
}

/// Resolves group → transform → shape → model chains in file order.
///
/// Dangling ids are skipped.
#[must_use]
pub fn placements(model: &Model) -> Vec<Placement<'_>> {
    let mut out = Vec::new();
    for group in &model.groups {
        for child in &group.child_ids {
            let Some(transform) = model.transforms.get(child) else {
                continue;
            };
            let Some(shape) = model.shapes.get(&transform.child_id) else {
                continue;
            };
            let translation = transform.rounded_translation();
            for shape_id in &shape.model_ids {
                let grid = model
                    .shape_models
                    .get(shape_id)
                    .and_then(|m| model.grids.get(m.grid_index));
                if let Some(grid) = grid {
                    out.push(Placement { translation, grid });
                }
            }
        }
    }
    out
}

/// Flattens `model` into a single grid.
///
/// Without a scene graph the first grid is returned as is. Otherwise every
/// placement is copied at its translation; negative translations shift the
/// whole axis so that the minimum lands at 0. The first shape written to a
/// cell keeps it.
///
/// The output never exceeds [`MAX_GRID_SIZE`] per axis. A placement that
/// would stretch any axis past it is skipped with a warning.
#[must_use]
pub fn flatten(model: &Model) -> VoxelGrid {
    if !model.has_scene_graph() {
        return model.grids.first().cloned().unwrap_or_else(|| VoxelGrid::new(1));
    }

    let placements = placements(model);
    let limit = i64::try_from(MAX_GRID_SIZE).unwrap_or(i64::MAX);

    // Occupied span per axis, always including the origin cell.
    let mut low = [0i64; 3];
    let mut high = [1i64; 3];
    let mut kept = Vec::with_capacity(placements.len());
    for p in &placements {
        let extent = i64::try_from(p.grid.size()).unwrap_or(i64::MAX);
        let start = p.translation.map(i64::from);
        let lo = [0, 1, 2].map(|a| low[a].min(start[a]));
        let hi = [0, 1, 2].map(|a| high[a].max(start[a].saturating_add(extent)));
        if (0..3).any(|a| hi[a] - lo[a] > limit) {
            tracing::warn!(
                "skipping placement at {:?} (size {}): scene would exceed {} cells",
                p.translation,
                p.grid.size(),
                MAX_GRID_SIZE
            );
            continue;
        }
        low = lo;
        high = hi;
        kept.push(*p);
    }

    let span = (0..3).map(|a| high[a] - low[a]).max().unwrap_or(1);
    let size = usize::try_from(span).unwrap_or(1);

    let mut out = VoxelGrid::new(size);
    for p in &kept {
        let origin = [0, 1, 2].map(|a| i64::from(p.translation[a]) - low[a]);
        for (cell, color) in p.grid.iter_filled() {
            let [x, y, z] = [0, 1, 2].map(|a| {
                i64::try_from(cell[a])
                    .ok()
                    .and_then(|c| i32::try_from(c + origin[a]).ok())
                    .unwrap_or(i32::MAX)
            });
            if let Some(i) = out.checked_index(x, y, z) {
                let dest = &mut out.cells_mut()[i];
                if *dest == 0 {
                    *dest = color;
                }
            }
        }
    }

    tracing::info!(
        "flattened {} of {} placements into size {} ({} filled)",
        kept.len(),
        placements.len(),
        size,
        out.filled_count()
    );
    out
}
