//! Scene graph: transform, group and shape nodes plus the parsed model.

use std::collections::{BTreeMap, HashMap};

use crate::grid::{Bounds, VoxelGrid};

/// Ordered string dictionary as stored in node and material chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict(pub Vec<(String, String)>);

impl Dict {
    /// Looks up the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Euler rotation read from a transform's first frame, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    /// Rotation about the forward axis.
    pub roll: f32,
    /// Rotation about the lateral axis.
    pub pitch: f32,
    /// Rotation about the vertical axis.
    pub yaw: f32,
}

/// `nTRN` node: places a single child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformNode {
    /// Node id.
    pub id: i32,
    /// Node attributes (`_name`, `_hidden`, ...).
    pub attributes: Dict,
    /// Id of the placed child node.
    pub child_id: i32,
    /// Reserved id, always -1 in practice.
    pub reserved_id: i32,
    /// Layer the node belongs to.
    pub layer_id: i32,
    /// First-frame rotation.
    pub rotation: Rotation,
    /// First-frame translation, z already lowered by half the model height.
    pub translation: [f32; 3],
    /// Raw attributes of every frame.
    pub frames: Vec<Dict>,
}

impl TransformNode {
    /// Translation rounded half-up to whole cells.
    #[must_use]
    pub fn rounded_translation(&self) -> [i32; 3] {
        self.translation.map(round_half_up)
    }
}

/// Rounds half-up, matching how the editor snaps node positions.
#[allow(clippy::cast_possible_truncation)]
#[inline]
#[must_use]
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// `nGRP` node: an ordered list of child transforms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupNode {
    /// Node id.
    pub id: i32,
    /// Node attributes.
    pub attributes: Dict,
    /// Child node ids, in file order.
    pub child_ids: Vec<i32>,
}

/// `nSHP` node: references one or more shape models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeNode {
    /// Node id.
    pub id: i32,
    /// Node attributes.
    pub attributes: Dict,
    /// Referenced shape ids; resolve through [`Model::shape_models`].
    pub model_ids: Vec<i32>,
}

/// A placed voxel grid, shared by every shape node that references it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeModel {
    /// Shape id as referenced by `nSHP`.
    pub shape_id: i32,
    /// Index into [`Model::grids`].
    pub grid_index: usize,
    /// Bounds of every record in the grid's `XYZI` chunk.
    pub bounds: Bounds,
    /// Rounded translation of the transform parsed last before the shape.
    pub offset: [i32; 3],
}

/// Running centroid of one reserved marker color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkMarker {
    /// Sum of x, y, z over all marker voxels.
    pub sum: [i64; 3],
    /// Number of marker voxels.
    pub count: u32,
}

impl LinkMarker {
    /// Adds one marker voxel.
    pub fn accumulate(&mut self, point: [i32; 3]) {
        for a in 0..3 {
            self.sum[a] += i64::from(point[a]);
        }
        self.count += 1;
    }

    /// Mean position of the accumulated voxels.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn centroid(&self) -> [f32; 3] {
        if self.count == 0 {
            return [0.0; 3];
        }
        let n = self.count as f32;
        self.sum.map(|s| s as f32 / n)
    }
}

/// Attachment points recovered from reserved colors of one grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLinks {
    /// Running centroid per reserved color.
    pub centroids: BTreeMap<u8, LinkMarker>,
    /// Every marker position per reserved color, in file order.
    pub markers: BTreeMap<u8, Vec<[i32; 3]>>,
}

impl GridLinks {
    /// True if the grid had no reserved-color voxels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }
}

/// Everything recovered from one VOX stream except palette and materials.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Declared file version.
    pub version: i32,
    /// One grid per `XYZI` chunk, in file order.
    pub grids: Vec<VoxelGrid>,
    /// Declared `SIZE` extents, parallel to `grids`.
    pub extents: Vec<[i32; 3]>,
    /// Link markers, parallel to `grids`.
    pub links: Vec<GridLinks>,
    /// Transform nodes by id.
    pub transforms: HashMap<i32, TransformNode>,
    /// Group nodes in file order.
    pub groups: Vec<GroupNode>,
    /// Shape nodes by id.
    pub shapes: HashMap<i32, ShapeNode>,
    /// Shape models by shape id.
    pub shape_models: HashMap<i32, ShapeModel>,
    /// Union of every placed shape's bounds plus offset.
    pub bounds: Bounds,
}

impl Model {
    /// Number of grids.
    #[must_use]
    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }

    /// True if no grid was parsed. Callers must check this before indexing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Grid by index.
    #[must_use]
    pub fn grid(&self, index: usize) -> Option<&VoxelGrid> {
        self.grids.get(index)
    }

    /// True if the file carried a scene graph.
    #[must_use]
    pub fn has_scene_graph(&self) -> bool {
        !self.groups.is_empty()
    }
}
