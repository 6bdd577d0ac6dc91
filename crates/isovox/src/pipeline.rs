//! # Conversion Pipeline
//!
//! ```text
//! file ──parse──▶ ParseResult ──flatten──▶ VoxelGrid ──classify──▶ ClassifiedGrid
//!                                                                     │ rotate ×(n-1)
//!                                                                     ▼
//!                                                               SpriteSource ──▶ renderer
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use isovox_scene::{flatten, parse, Materials, Palette, ParseResult, VoxWriter};
use isovox_slope::{rotate_clockwise, ClassifiedGrid, Classifier};

use crate::config::IsovoxConfig;
use crate::error::{IsovoxError, IsovoxResult};
use crate::render::{IndexedImage, SpriteRenderer};

/// Everything a sprite renderer needs for one model.
#[derive(Debug, Clone, Default)]
pub struct SpriteSource {
    /// Palette of the source file.
    pub palette: Palette,
    /// Materials of the source file.
    pub materials: Materials,
    /// Classified grid per view; entry `k` is turned `k` quarter turns.
    pub rotations: Vec<ClassifiedGrid>,
}

/// Drives load, flatten, classify and rotate with one configuration.
#[derive(Debug, Default)]
pub struct Pipeline {
    config: IsovoxConfig,
    classifier: Classifier,
}

impl Pipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(config: IsovoxConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &IsovoxConfig {
        &self.config
    }

    /// Parses a VOX file. A missing file yields an empty result with no
    /// grids; callers must check [`isovox_scene::Model::is_empty`].
    ///
    /// # Errors
    ///
    /// `Io` for read failures other than a missing file, `Vox` if the file
    /// is not a valid scene.
    pub fn load_or_default(&self, path: impl AsRef<Path>) -> IsovoxResult<ParseResult> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("{} not found, using an empty scene", path.display());
                return Ok(ParseResult::default());
            }
            Err(source) => {
                return Err(IsovoxError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let parsed = parse(BufReader::new(file), self.config.parse.mode)?;
        tracing::debug!("loaded {}: {} grids", path.display(), parsed.model.grid_count());
        Ok(parsed)
    }

    /// Flattens, classifies and rotates a parsed scene.
    pub fn convert(&mut self, parsed: &ParseResult) -> SpriteSource {
        if parsed.model.is_empty() {
            tracing::warn!("converting a scene with no grids");
        }
        let flat = flatten(&parsed.model);
        let base = self.classifier.classify(&flat);

        let views = usize::from(self.config.render.rotations.clamp(1, 4));
        let mut rotations = Vec::with_capacity(views);
        rotations.push(base);
        while rotations.len() < views {
            let next = rotations.last().map(rotate_clockwise).unwrap_or_default();
            rotations.push(next);
        }

        tracing::info!(
            "converted scene: size {}, {} drawn cells, {} views",
            flat.size(),
            rotations[0].drawn_count(),
            rotations.len()
        );
        SpriteSource {
            palette: parsed.palette,
            materials: parsed.materials.clone(),
            rotations,
        }
    }

    /// [`Pipeline::load_or_default`] followed by [`Pipeline::convert`].
    ///
    /// # Errors
    ///
    /// See [`Pipeline::load_or_default`].
    pub fn convert_file(&mut self, path: impl AsRef<Path>) -> IsovoxResult<SpriteSource> {
        let parsed = self.load_or_default(path)?;
        Ok(self.convert(&parsed))
    }

    /// Renders every view of `source` at animation `frame`.
    pub fn render_all<R: SpriteRenderer + ?Sized>(
        &self,
        source: &SpriteSource,
        renderer: &mut R,
        frame: u32,
    ) -> Vec<IndexedImage> {
        (0u8..)
            .zip(&source.rotations)
            .map(|(turns, grid)| renderer.render(grid, &source.palette, turns, frame))
            .collect()
    }

    /// Writes the flattened scene as a single-grid VOX file.
    ///
    /// # Errors
    ///
    /// `Vox` if the grid is too large or the sink fails.
    pub fn write_flat<W: Write>(&self, out: W, parsed: &ParseResult) -> IsovoxResult<()> {
        let flat = flatten(&parsed.model);
        VoxWriter::new(self.config.write.version).write(
            out,
            &flat,
            parsed.palette.as_slice(),
            &parsed.materials,
        )?;
        Ok(())
    }
}
