//! Benchmarks for the spectral transform.
//!
//! Run with: `cargo bench --bench transform_bench`
//!
//! Compares forward, inverse and vector transforms across truncations and
//! number formats.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex;
use spectral_gcm::spectral::{SpectralField, SpectralTransform};
use spectral_gcm::{Geometry, ModelConfig, NumberFormat};

const TRUNCATIONS: [usize; 3] = [21, 42, 85];

fn setup<NF: NumberFormat>(truncation: usize) -> (SpectralTransform<NF>, SpectralField<NF>) {
    let config = ModelConfig::default().with_truncation(truncation).with_levels(1);
    let geometry = Arc::new(Geometry::from_config(&config).expect("valid geometry"));
    let transform = SpectralTransform::new(geometry);
    let shape = transform.geometry().scalar_truncation();
    let field = SpectralField::from_fn(shape, |m, n| {
        let x = NF::from_f64_lossy(1.0 / (1 + m + n) as f64);
        Complex::new(x, if m == 0 { NF::zero() } else { x })
    });
    (transform, field)
}

/// Spectral to grid.
fn bench_gridded(c: &mut Criterion) {
    let mut group = c.benchmark_group("gridded");

    for t in TRUNCATIONS {
        let (tr64, f64_field) = setup::<f64>(t);
        group.bench_with_input(BenchmarkId::new("f64", format!("T{}", t)), &t, |b, _| {
            b.iter(|| tr64.gridded(black_box(&f64_field)));
        });

        let (tr32, f32_field) = setup::<f32>(t);
        group.bench_with_input(BenchmarkId::new("f32", format!("T{}", t)), &t, |b, _| {
            b.iter(|| tr32.gridded(black_box(&f32_field)));
        });
    }

    group.finish();
}

/// Grid to spectral.
fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral");

    for t in TRUNCATIONS {
        let (tr, field) = setup::<f64>(t);
        let grid = tr.gridded(&field);
        group.bench_with_input(BenchmarkId::new("f64", format!("T{}", t)), &t, |b, _| {
            b.iter(|| tr.spectral(black_box(&grid)));
        });
    }

    group.finish();
}

/// Winds from vorticity and divergence, and back.
fn bench_vector_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector");

    for t in [21, 42] {
        let (tr, field) = setup::<f64>(t);
        let (u, v) = tr.velocity_grids(&field, &field);

        group.bench_with_input(BenchmarkId::new("velocity_grids", format!("T{}", t)), &t, |b, _| {
            b.iter(|| tr.velocity_grids(black_box(&field), black_box(&field)));
        });
        group.bench_with_input(BenchmarkId::new("divergence_curl", format!("T{}", t)), &t, |b, _| {
            b.iter(|| tr.divergence_curl(black_box(&u), black_box(&v)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gridded, bench_spectral, bench_vector_transforms);
criterion_main!(benches);
