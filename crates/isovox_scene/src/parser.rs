//! Scene reconstruction from a VOX stream.
//!
//! Decoding ([`ChunkReader`]) and interpretation ([`SceneBuilder`]) are split:
//! the reader yields self-contained [`SceneChunk`] values, the builder folds
//! them into a [`ParseResult`] with one exhaustive match. Every call starts
//! from a fresh result, so a failed parse leaves nothing behind.
//!
//! ## Example
//!
//! ```rust,ignore
//! use isovox_scene::{parse, ParseMode};
//!
//! let parsed = parse(std::fs::File::open("ship.vox")?, ParseMode::Specialized)?;
//! if !parsed.model.is_empty() {
//!     let grid = &parsed.model.grids[0];
//! }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkReader, GroupChunk, SceneChunk, ShapeChunk, TransformChunk};
use crate::error::{VoxError, VoxResult};
use crate::graph::{
    round_half_up, GridLinks, GroupNode, Model, Rotation, ShapeModel, ShapeNode, TransformNode,
};
use crate::grid::{Bounds, VoxelGrid, MAX_GRID_SIZE};
use crate::material::Materials;
use crate::palette::Palette;

/// Colors with both of these bits set are link markers in specialized mode.
pub const LINK_MASK: u8 = 0xC0;

/// How reserved colors are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Every record is an ordinary voxel.
    General,
    /// Colors `>= 0xC0` become link markers instead of voxels.
    #[default]
    Specialized,
}

impl ParseMode {
    /// True if `color` is a link marker under this mode.
    #[inline]
    #[must_use]
    pub const fn is_link(self, color: u8) -> bool {
        matches!(self, Self::Specialized) && color & LINK_MASK == LINK_MASK
    }
}

/// Output of one parse.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Grids and scene graph.
    pub model: Model,
    /// Palette; the fallback palette unless the file had an `RGBA` chunk.
    pub palette: Palette,
    /// Materials by palette index.
    pub materials: Materials,
}

/// Parses a complete VOX stream.
///
/// # Errors
///
/// `BadMagic` if the signature is wrong, `TruncatedStream` if the stream
/// ends or fails inside a chunk, `InvalidSize` for extents outside
/// `0..=256`.
pub fn parse<R: Read>(reader: R, mode: ParseMode) -> VoxResult<ParseResult> {
    let mut chunks = ChunkReader::new(reader);
    let version = chunks.read_header()?;
    let mut builder = SceneBuilder::new(mode, version);

    while let Some(chunk) = chunks.next_chunk()? {
        tracing::debug!("chunk {}", chunk.name());
        builder.apply(chunk)?;
    }

    let result = builder.finish();
    tracing::info!(
        "parsed VOX v{}: {} grids, {} transforms, {} groups, {} shapes, {} materials",
        result.model.version,
        result.model.grids.len(),
        result.model.transforms.len(),
        result.model.groups.len(),
        result.model.shapes.len(),
        result.materials.len()
    );
    Ok(result)
}

/// Parses VOX data held in memory.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_bytes(data: &[u8], mode: ParseMode) -> VoxResult<ParseResult> {
    parse(data, mode)
}

/// Folds decoded chunks into a [`ParseResult`].
#[derive(Debug)]
pub struct SceneBuilder {
    mode: ParseMode,
    result: ParseResult,
    /// Cube size from the last `SIZE` chunk.
    size: usize,
    /// X/Y centering offsets from the last `SIZE` chunk.
    center: [i32; 2],
    /// Declared extents from the last `SIZE` chunk.
    extent: [i32; 3],
    /// Record bounds per grid, parallel to `model.grids`.
    grid_bounds: Vec<Bounds>,
    /// Rounded translation of the last transform node.
    last_offset: [i32; 3],
}

impl SceneBuilder {
    /// Starts an empty scene.
    #[must_use]
    pub fn new(mode: ParseMode, version: i32) -> Self {
        let mut result = ParseResult::default();
        result.model.version = version;
        Self {
            mode,
            result,
            size: 0,
            center: [0; 2],
            extent: [0; 3],
            grid_bounds: Vec::new(),
            last_offset: [0; 3],
        }
    }

    /// Applies one chunk.
    ///
    /// # Errors
    ///
    /// `InvalidSize` if a `SIZE` chunk declares an extent outside `0..=256`.
    pub fn apply(&mut self, chunk: SceneChunk) -> VoxResult<()> {
        match chunk {
            SceneChunk::Size(extent) => self.apply_size(extent)?,
            SceneChunk::Xyzi(records) => self.apply_xyzi(&records)?,
            SceneChunk::Rgba(colors) => {
                for (index, color) in (1..=u8::MAX).zip(colors) {
                    self.result.palette.set(index, color);
                }
            }
            SceneChunk::Matl { id, properties } => {
                let material = self.result.materials.entry(id).or_default();
                for (key, value) in properties.iter() {
                    material.merge_pair(key, value);
                }
            }
            SceneChunk::Transform(t) => self.apply_transform(t),
            SceneChunk::Group(g) => self.apply_group(g),
            SceneChunk::Shape(s) => self.apply_shape(s),
            SceneChunk::Unknown { id, skipped } => {
                tracing::debug!("skipped {} bytes of '{}'", skipped, String::from_utf8_lossy(&id));
            }
        }
        Ok(())
    }

    /// Finishes the scene.
    #[must_use]
    pub fn finish(self) -> ParseResult {
        self.result
    }

    fn apply_size(&mut self, extent: [i32; 3]) -> VoxResult<()> {
        let mut size = 0usize;
        for &e in &extent {
            let e = usize::try_from(e)
                .ok()
                .filter(|&e| e <= MAX_GRID_SIZE)
                .ok_or(VoxError::InvalidSize(extent))?;
            size = size.max(e);
        }
        // Both fit in 0..=256 here.
        let side = i32::try_from(size).map_err(|_| VoxError::InvalidSize(extent))?;
        self.size = size;
        self.center = [(side - extent[0]) / 2, (side - extent[1]) / 2];
        self.extent = extent;
        Ok(())
    }

    fn apply_xyzi(&mut self, records: &[[u8; 4]]) -> VoxResult<()> {
        let mut grid = VoxelGrid::try_new(self.size)?;
        let mut links = GridLinks::default();
        let mut bounds = Bounds::EMPTY;

        for &[x, y, z, color] in records {
            let point = [
                i32::from(x) + self.center[0],
                i32::from(y) + self.center[1],
                i32::from(z),
            ];
            bounds.include(point);

            if self.mode.is_link(color) {
                links.centroids.entry(color).or_default().accumulate(point);
                links.markers.entry(color).or_default().push(point);
            } else {
                grid.set(point[0], point[1], point[2], color);
            }
        }

        tracing::debug!(
            "grid {}: size {}, {} records, {} link colors",
            self.result.model.grids.len(),
            self.size,
            records.len(),
            links.centroids.len()
        );
        self.result.model.grids.push(grid);
        self.result.model.extents.push(self.extent);
        self.result.model.links.push(links);
        self.grid_bounds.push(bounds);
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn apply_transform(&mut self, chunk: TransformChunk) {
        let mut rotation = Rotation::default();
        let mut translation = [0.0f32; 3];

        if let Some(frame) = chunk.frames.first() {
            let angle = |key: &str| frame.get(key).and_then(|v| v.trim().parse::<f32>().ok());
            if let Some(v) = angle("_roll") {
                rotation.roll = v;
            }
            if let Some(v) = angle("_pitch") {
                rotation.pitch = v;
            }
            if let Some(v) = angle("_yaw") {
                rotation.yaw = v;
            }
            if let Some(t) = frame.get("_t") {
                for (slot, part) in translation.iter_mut().zip(t.split_whitespace()) {
                    if let Ok(v) = part.parse::<f32>() {
                        *slot = v;
                    }
                }
            }
        }
        translation[2] -= (self.extent[2] / 2) as f32;

        let node = TransformNode {
            id: chunk.id,
            attributes: chunk.attributes,
            child_id: chunk.child_id,
            reserved_id: chunk.reserved_id,
            layer_id: chunk.layer_id,
            rotation,
            translation,
            frames: chunk.frames,
        };
        self.last_offset = node.translation.map(round_half_up);
        self.result.model.transforms.insert(node.id, node);
    }

    fn apply_group(&mut self, chunk: GroupChunk) {
        self.result.model.groups.push(GroupNode {
            id: chunk.id,
            attributes: chunk.attributes,
            child_ids: chunk.child_ids,
        });
    }

    fn apply_shape(&mut self, chunk: ShapeChunk) {
        let model = &mut self.result.model;
        let mut model_ids = Vec::with_capacity(chunk.models.len());

        for (shape_id, _attributes) in chunk.models {
            let grid_index = usize::try_from(shape_id).unwrap_or(usize::MAX);
            let bounds = self.grid_bounds.get(grid_index).copied().unwrap_or_default();
            let shared = model.shape_models.entry(shape_id).or_insert(ShapeModel {
                shape_id,
                grid_index,
                bounds,
                offset: [0; 3],
            });
            shared.offset = self.last_offset;
            model.bounds.union(&shared.bounds.translated(shared.offset));
            model_ids.push(shape_id);
        }

        model.shapes.insert(
            chunk.id,
            ShapeNode {
                id: chunk.id,
                attributes: chunk.attributes,
                model_ids,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoxError;
    use crate::palette::FALLBACK_PALETTE;

    fn chunk(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(id);
        buf.extend_from_slice(&(content.len() as i32).to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(content);
        buf
    }

    fn ints(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn dict(pairs: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = ints(&[pairs.len() as i32]);
        for (k, v) in pairs {
            buf.extend(ints(&[k.len() as i32]));
            buf.extend_from_slice(k.as_bytes());
            buf.extend(ints(&[v.len() as i32]));
            buf.extend_from_slice(v.as_bytes());
        }
        buf
    }

    fn file(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut data = b"VOX ".to_vec();
        data.extend(ints(&[150]));
        data.extend(chunk(b"MAIN", &[]));
        for c in chunks {
            data.extend_from_slice(c);
        }
        data
    }

    fn xyzi(records: &[[u8; 4]]) -> Vec<u8> {
        let mut content = ints(&[records.len() as i32]);
        for r in records {
            content.extend_from_slice(r);
        }
        chunk(b"XYZI", &content)
    }

    fn transform(id: i32, child: i32, frame: &[(&str, &str)]) -> Vec<u8> {
        let mut content = ints(&[id]);
        content.extend(dict(&[]));
        content.extend(ints(&[child, -1, 0, 1]));
        content.extend(dict(frame));
        chunk(b"nTRN", &content)
    }

    #[test]
    fn test_size_centers_x_and_y() {
        let data = file(&[
            chunk(b"SIZE", &ints(&[2, 4, 3])),
            xyzi(&[[0, 0, 0, 1], [1, 3, 2, 2]]),
        ]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();
        let grid = &parsed.model.grids[0];

        assert_eq!(grid.size(), 4);
        // x is centered by (4 - 2) / 2 = 1, y by 0, z never.
        assert_eq!(grid.get(1, 0, 0), 1);
        assert_eq!(grid.get(2, 3, 2), 2);
        assert_eq!(grid.filled_count(), 2);
        assert_eq!(parsed.model.extents[0], [2, 4, 3]);
    }

    #[test]
    fn test_specialized_mode_collects_links() {
        let records = [[0, 0, 0, 3], [1, 1, 1, 0xC1], [3, 1, 1, 0xC1], [2, 2, 2, 0xF0]];
        let data = file(&[chunk(b"SIZE", &ints(&[4, 4, 4])), xyzi(&records)]);
        let parsed = parse_bytes(&data, ParseMode::Specialized).unwrap();
        let grid = &parsed.model.grids[0];
        let links = &parsed.model.links[0];

        assert_eq!(grid.filled_count(), 1);
        assert_eq!(grid.get(0, 0, 0), 3);
        assert_eq!(links.centroids[&0xC1].centroid(), [2.0, 1.0, 1.0]);
        assert_eq!(links.markers[&0xC1], vec![[1, 1, 1], [3, 1, 1]]);
        assert_eq!(links.centroids[&0xF0].count, 1);
    }

    #[test]
    fn test_general_mode_keeps_reserved_colors() {
        let records = [[1, 1, 1, 0xC1], [2, 2, 2, 0xBF]];
        let data = file(&[chunk(b"SIZE", &ints(&[4, 4, 4])), xyzi(&records)]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();

        assert_eq!(parsed.model.grids[0].get(1, 1, 1), 0xC1);
        assert_eq!(parsed.model.grids[0].get(2, 2, 2), 0xBF);
        assert!(parsed.model.links[0].is_empty());
    }

    #[test]
    fn test_rgba_never_touches_index_zero() {
        let mut content = Vec::new();
        for _ in 0..255 {
            content.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
        }
        content.extend_from_slice(&[0xFF; 4]);
        let data = file(&[chunk(b"RGBA", &content)]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();

        assert_eq!(parsed.palette.get(0), 0);
        assert_eq!(parsed.palette.get(1), 0x1234_5678);
        assert_eq!(parsed.palette.get(255), 0x1234_5678);
    }

    #[test]
    fn test_missing_rgba_keeps_fallback() {
        let parsed = parse_bytes(&file(&[]), ParseMode::General).unwrap();
        assert_eq!(parsed.palette.as_slice(), &FALLBACK_PALETTE[..]);
        assert!(parsed.model.is_empty());
        assert_eq!(parsed.model.version, 150);
    }

    #[test]
    fn test_matl_merges_into_same_material() {
        let mut first = ints(&[8]);
        first.extend(dict(&[("_type", "_emit"), ("_emit", "2.5")]));
        let mut second = ints(&[8]);
        second.extend(dict(&[("_flux", "1"), ("_bogus", "3")]));
        let data = file(&[chunk(b"MATL", &first), chunk(b"MATL", &second)]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();

        let mat = &parsed.materials[&8];
        assert_eq!(mat.kind, crate::material::MaterialKind::Emit);
        assert_eq!(mat.get(crate::material::MaterialTrait::Emit), Some(2.5));
        assert_eq!(mat.get(crate::material::MaterialTrait::Flux), Some(1.0));
        assert_eq!(mat.traits.len(), 2);
    }

    #[test]
    fn test_transform_reads_first_frame_and_lowers_z() {
        let data = file(&[
            chunk(b"SIZE", &ints(&[4, 4, 7])),
            transform(2, 3, &[("_t", "10 oops 6"), ("_yaw", "90"), ("_roll", "x")]),
        ]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();
        let node = &parsed.model.transforms[&2];

        assert_eq!(node.child_id, 3);
        assert_eq!(node.reserved_id, -1);
        // y failed to parse and keeps 0; z lowered by 7 / 2 = 3.
        assert_eq!(node.translation, [10.0, 0.0, 3.0]);
        assert_eq!(node.rotation, Rotation { roll: 0.0, pitch: 0.0, yaw: 90.0 });
        assert_eq!(node.frames.len(), 1);
    }

    #[test]
    fn test_shape_stamps_offset_and_global_bounds() {
        let mut shape = ints(&[3]);
        shape.extend(dict(&[]));
        shape.extend(ints(&[1, 0]));
        shape.extend(dict(&[]));

        let data = file(&[
            chunk(b"SIZE", &ints(&[2, 2, 2])),
            xyzi(&[[0, 0, 0, 1], [1, 1, 1, 1]]),
            transform(2, 3, &[("_t", "5 -2 1")]),
            chunk(b"nSHP", &shape),
        ]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();
        let model = &parsed.model;
        let shared = model.shape_models[&0];

        assert_eq!(model.shapes[&3].model_ids, vec![0]);
        assert_eq!(shared.grid_index, 0);
        assert_eq!(shared.offset, [5, -2, 0]);
        assert_eq!(shared.bounds.min, [0, 0, 0]);
        assert_eq!(shared.bounds.max, [1, 1, 1]);
        assert_eq!(model.bounds.min, [5, -2, 0]);
        assert_eq!(model.bounds.max, [6, -1, 1]);
    }

    #[test]
    fn test_failed_parse_returns_error() {
        let mut data = file(&[chunk(b"SIZE", &ints(&[2, 2, 2]))]);
        data.extend_from_slice(b"XYZI");
        data.extend(ints(&[100, 0, 25]));
        assert!(matches!(
            parse_bytes(&data, ParseMode::General),
            Err(VoxError::TruncatedStream(_))
        ));
        assert!(matches!(
            parse_bytes(b"VOY \x96\0\0\0", ParseMode::General),
            Err(VoxError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_negative_extent_is_rejected() {
        for extent in [[i32::MIN, 1, 1], [1, -1, 1], [2, 2, -7]] {
            let data = file(&[chunk(b"SIZE", &ints(&extent)), xyzi(&[])]);
            match parse_bytes(&data, ParseMode::General) {
                Err(VoxError::InvalidSize(found)) => assert_eq!(found, extent),
                other => panic!("expected InvalidSize for {extent:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_oversized_extent_is_rejected() {
        for extent in [[3_000_000, 1, 1], [1, 2000, 1], [1, 1, 257], [i32::MAX; 3]] {
            let data = file(&[chunk(b"SIZE", &ints(&extent)), xyzi(&[[0, 0, 0, 1]])]);
            assert!(
                matches!(parse_bytes(&data, ParseMode::General), Err(VoxError::InvalidSize(_))),
                "{extent:?}"
            );
        }
    }

    #[test]
    fn test_largest_extent_is_accepted() {
        let data = file(&[chunk(b"SIZE", &ints(&[256, 1, 256]))]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();
        assert_eq!(parsed.model.extents.len(), 0);

        let data = file(&[chunk(b"SIZE", &ints(&[0, 0, 0])), xyzi(&[[0, 0, 0, 1]])]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();
        assert_eq!(parsed.model.grids[0].size(), 0);
        assert_eq!(parsed.model.grids[0].filled_count(), 0);
    }

    #[test]
    fn test_far_translation_parses() {
        let mut shape = ints(&[3]);
        shape.extend(dict(&[]));
        shape.extend(ints(&[1, 0]));
        shape.extend(dict(&[]));

        let mut group = ints(&[1]);
        group.extend(dict(&[]));
        group.extend(ints(&[1, 2]));

        let data = file(&[
            chunk(b"SIZE", &ints(&[1, 1, 1])),
            xyzi(&[[0, 0, 0, 1]]),
            chunk(b"nGRP", &group),
            transform(2, 3, &[("_t", "-1e10 1e10 0")]),
            chunk(b"nSHP", &shape),
        ]);
        let parsed = parse_bytes(&data, ParseMode::General).unwrap();
        let shared = parsed.model.shape_models[&0];
        assert_eq!(shared.offset, [i32::MIN, i32::MAX, 0]);
        assert_eq!(parsed.model.bounds.min, [i32::MIN, i32::MAX, 0]);

        // Too far away to place; the scene flattens to an empty cell.
        let flat = crate::flatten::flatten(&parsed.model);
        assert_eq!(flat, VoxelGrid::new(1));
    }
}
