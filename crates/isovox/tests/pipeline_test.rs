//! Integration tests for the conversion pipeline.

use std::path::PathBuf;

use isovox::scene::{Materials, Palette, ParseMode, VoxError, VoxWriter, VoxelGrid};
use isovox::slope::{ClassifiedGrid, Slope};
use isovox::{IndexedImage, IsovoxConfig, IsovoxError, Pipeline, SpriteRenderer};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn temp_path(name: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("isovox_{name}_{id}"))
}

fn random_grid(size: usize, seed: u64) -> VoxelGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = VoxelGrid::new(size);
    for cell in grid.cells_mut() {
        if rng.gen_bool(0.25) {
            *cell = rng.gen_range(1..0xC0);
        }
    }
    grid
}

/// Renders one pixel per drawn top-layer column; enough to see the views.
struct CountingRenderer {
    calls: Vec<(u8, u32)>,
}

impl SpriteRenderer for CountingRenderer {
    fn render(
        &mut self,
        grid: &ClassifiedGrid,
        _palette: &Palette,
        quarter_turns: u8,
        frame: u32,
    ) -> IndexedImage {
        self.calls.push((quarter_turns, frame));
        let n = grid.size();
        let mut image = IndexedImage::new(n, n);
        let side = i32::try_from(n).unwrap();
        for x in 0..side {
            for y in 0..side {
                if let Some(z) = (0..side).rev().find(|&z| grid.color(x, y, z) != 0) {
                    image.set(x as usize, y as usize, grid.color(x, y, z));
                }
            }
        }
        image
    }
}

#[test]
fn test_missing_file_is_empty_scene() {
    let pipeline = Pipeline::default();
    let parsed = pipeline.load_or_default(temp_path("missing.vox")).unwrap();
    assert!(parsed.model.is_empty());
    assert_eq!(parsed.palette, Palette::default());
}

#[test]
fn test_convert_file_round_trip() {
    let path = temp_path("round_trip.vox");
    let grid = random_grid(6, 3);
    let mut file = std::fs::File::create(&path).unwrap();
    VoxWriter::default()
        .write(&mut file, &grid, &[], &Materials::new())
        .unwrap();
    drop(file);

    let mut pipeline = Pipeline::default();
    let source = pipeline.convert_file(&path).unwrap();
    assert_eq!(source.rotations.len(), 4);
    assert_eq!(source.rotations[0].solid_projection(), grid);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_bad_file_is_an_error() {
    let path = temp_path("bad.vox");
    std::fs::write(&path, b"PNG\x00\x01\x00\x00\x00").unwrap();

    let result = Pipeline::default().load_or_default(&path);
    assert!(matches!(
        result,
        Err(IsovoxError::Vox(VoxError::BadMagic { .. }))
    ));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_write_flat_uses_configured_version() {
    let config = IsovoxConfig::from_toml_str("[write]\nversion = 200").unwrap();
    let pipeline = Pipeline::new(config);

    let mut parsed = isovox::scene::ParseResult::default();
    parsed.model.grids.push(random_grid(4, 5));

    let mut bytes = Vec::new();
    pipeline.write_flat(&mut bytes, &parsed).unwrap();
    assert_eq!(&bytes[0..4], b"VOX ");
    assert_eq!(i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 200);

    let reparsed = isovox::scene::parse_bytes(&bytes, ParseMode::Specialized).unwrap();
    assert_eq!(reparsed.model.grids[0], parsed.model.grids[0]);
}

#[test]
fn test_config_file_drives_pipeline() {
    let path = temp_path("isovox.toml");
    std::fs::write(&path, "[parse]\nmode = \"general\"\n\n[render]\nrotations = 2\n").unwrap();
    let config = IsovoxConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    // A reserved color survives in general mode.
    let mut grid = VoxelGrid::new(3);
    grid.set(1, 1, 0, 0xC5);
    let vox = temp_path("general.vox");
    let bytes = VoxWriter::default()
        .to_bytes(&grid, &[], &Materials::new())
        .unwrap();
    std::fs::write(&vox, bytes).unwrap();

    let mut pipeline = Pipeline::new(config);
    let source = pipeline.convert_file(&vox).unwrap();
    assert_eq!(source.rotations.len(), 2);
    assert_eq!(source.rotations[0].color(1, 1, 0), 0xC5);
    assert_eq!(source.rotations[0].slope(1, 1, 0), Slope::Solid);

    std::fs::remove_file(&vox).ok();
}

#[test]
fn test_missing_config_file() {
    let result = IsovoxConfig::from_file(temp_path("nope.toml"));
    assert!(matches!(result, Err(IsovoxError::Io { .. })));
}

#[test]
fn test_render_all_passes_each_view() {
    let mut parsed = isovox::scene::ParseResult::default();
    let mut grid = VoxelGrid::new(3);
    grid.set(0, 0, 0, 4);
    parsed.model.grids.push(grid);

    let mut pipeline = Pipeline::default();
    let source = pipeline.convert(&parsed);
    let mut renderer = CountingRenderer { calls: Vec::new() };
    let images = pipeline.render_all(&source, &mut renderer, 7);

    assert_eq!(renderer.calls, vec![(0, 7), (1, 7), (2, 7), (3, 7)]);
    assert_eq!(images.len(), 4);
    assert_eq!(images[0].get(0, 0), 4);
    assert_eq!(images[1].get(0, 2), 4);
    assert_eq!(images[2].get(2, 2), 4);
    assert_eq!(images[3].get(2, 0), 4);
}
