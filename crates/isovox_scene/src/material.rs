//! Per-color materials from `MATL` chunks.
//!
//! A material is a type tag plus a sparse set of float traits, keyed by the
//! palette index it applies to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Material type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Plain matte surface.
    #[default]
    Diffuse,
    /// Metallic surface.
    Metal,
    /// Light emitter.
    Emit,
    /// Transparent refractive surface.
    Glass,
    /// Mix of metal, plastic and glass.
    Blend,
    /// Participating medium (fog, cloud).
    Media,
}

impl MaterialKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Diffuse,
        Self::Metal,
        Self::Emit,
        Self::Glass,
        Self::Blend,
        Self::Media,
    ];

    /// Value stored under the `_type` key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Diffuse => "_diffuse",
            Self::Metal => "_metal",
            Self::Emit => "_emit",
            Self::Glass => "_glass",
            Self::Blend => "_blend",
            Self::Media => "_media",
        }
    }

    /// Parses a `_type` value. The leading underscore is optional.
    #[must_use]
    pub fn from_key(value: &str) -> Option<Self> {
        let bare = value.trim().trim_start_matches('_');
        Self::ALL.into_iter().find(|kind| &kind.key()[1..] == bare)
    }
}

/// Named numeric material trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialTrait {
    /// Blend weight.
    Weight,
    /// Roughness.
    Rough,
    /// Specular.
    Spec,
    /// Index of refraction.
    Ior,
    /// Attenuation.
    Att,
    /// Radiant flux.
    Flux,
    /// Emission strength.
    Emit,
    /// Low dynamic range emission.
    Ldr,
    /// Metalness.
    Metal,
    /// Plastic blend.
    Plastic,
    /// Opacity.
    Alpha,
    /// Transparency.
    Trans,
    /// Media density.
    Density,
    /// Media phase.
    Phase,
}

impl MaterialTrait {
    /// Every trait, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Weight,
        Self::Rough,
        Self::Spec,
        Self::Ior,
        Self::Att,
        Self::Flux,
        Self::Emit,
        Self::Ldr,
        Self::Metal,
        Self::Plastic,
        Self::Alpha,
        Self::Trans,
        Self::Density,
        Self::Phase,
    ];

    /// Dictionary key in a `MATL` chunk.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Weight => "_weight",
            Self::Rough => "_rough",
            Self::Spec => "_spec",
            Self::Ior => "_ior",
            Self::Att => "_att",
            Self::Flux => "_flux",
            Self::Emit => "_emit",
            Self::Ldr => "_ldr",
            Self::Metal => "_metal",
            Self::Plastic => "_plastic",
            Self::Alpha => "_alpha",
            Self::Trans => "_trans",
            Self::Density => "_d",
            Self::Phase => "_g",
        }
    }

    /// Looks up a trait by its dictionary key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// A material: type tag plus sparse traits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    /// Type tag.
    pub kind: MaterialKind,
    /// Numeric traits that were present in the file.
    pub traits: BTreeMap<MaterialTrait, f32>,
}

impl Material {
    /// Creates a material of the given kind with no traits.
    #[must_use]
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            traits: BTreeMap::new(),
        }
    }

    /// Sets a trait.
    #[must_use]
    pub fn with(mut self, t: MaterialTrait, value: f32) -> Self {
        self.traits.insert(t, value);
        self
    }

    /// Gets a trait value if present.
    #[must_use]
    pub fn get(&self, t: MaterialTrait) -> Option<f32> {
        self.traits.get(&t).copied()
    }

    /// Merges one dictionary pair. Unknown keys and unparsable values are
    /// ignored.
    pub fn merge_pair(&mut self, key: &str, value: &str) {
        if key == "_type" {
            if let Some(kind) = MaterialKind::from_key(value) {
                self.kind = kind;
            }
            return;
        }
        if let (Some(t), Ok(v)) = (MaterialTrait::from_key(key), value.trim().parse::<f32>()) {
            self.traits.insert(t, v);
        }
    }

    /// True when the material carries nothing beyond the defaults.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind == MaterialKind::Diffuse && self.traits.is_empty()
    }
}

/// Materials keyed by palette index.
pub type Materials = BTreeMap<i32, Material>;
