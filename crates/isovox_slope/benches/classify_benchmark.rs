//! # Classification Benchmark
//!
//! Compares a one-off `classify` against a reused `Classifier`, and times
//! a full quarter turn.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use isovox_scene::VoxelGrid;
use isovox_slope::{classify, rotate_clockwise, ClassifiedGrid, Classifier};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Terrain-like grid: solid below a noisy height field.
fn terrain(size: usize) -> VoxelGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut grid = VoxelGrid::new(size);
    let side = i32::try_from(size).unwrap_or(0);
    for x in 0..side {
        for y in 0..side {
            let height = rng.gen_range(0..=side / 2);
            for z in 0..height {
                grid.set(x, y, z, rng.gen_range(1..=4));
            }
        }
    }
    grid
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("slope_classify");

    for size in [16, 32, 64] {
        let grid = terrain(size);

        group.bench_with_input(BenchmarkId::new("fresh", size), &grid, |b, grid| {
            b.iter(|| black_box(classify(black_box(grid))));
        });

        let mut classifier = Classifier::new();
        let mut out = ClassifiedGrid::new(size);
        group.bench_with_input(BenchmarkId::new("reused", size), &grid, |b, grid| {
            b.iter(|| {
                classifier.classify_into(black_box(grid), &mut out);
                black_box(out.drawn_count())
            });
        });
    }

    group.finish();
}

fn bench_rotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("slope_rotate");

    for size in [16, 32, 64] {
        let classified = classify(&terrain(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &classified, |b, grid| {
            b.iter(|| black_box(rotate_clockwise(grid)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_rotate);
criterion_main!(benches);
