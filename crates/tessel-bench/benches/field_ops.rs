//! Criterion benchmarks for convolution and image resampling.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessel_bench::{reference_profile, stress_profile, unit_ring_kernel};
use tessel_core::Point2;
use tessel_grid::{convolve_into, Image};
use tessel_test_utils::random_field;

/// Benchmark: one-ring convolution over the reference profile.
fn bench_convolve_reference(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let (kernel, weights) = unit_ring_kernel(grid.pitch()).unwrap();
    let data = random_field(grid.len(), 1);
    let mut out = vec![0.0; grid.len()];

    c.bench_function("convolve_ring_reference", |b| {
        b.iter(|| {
            convolve_into(&grid, &kernel, &weights, &data, &mut out).unwrap();
            black_box(out[0]);
        });
    });
}

/// Benchmark: one-ring convolution over the stress profile.
fn bench_convolve_stress(c: &mut Criterion) {
    let grid = stress_profile().unwrap();
    let (kernel, weights) = unit_ring_kernel(grid.pitch()).unwrap();
    let data = random_field(grid.len(), 1);
    let mut out = vec![0.0; grid.len()];

    c.bench_function("convolve_ring_stress", |b| {
        b.iter(|| {
            convolve_into(&grid, &kernel, &weights, &data, &mut out).unwrap();
            black_box(out[0]);
        });
    });
}

/// Benchmark: resample a 64x64 image onto the reference profile.
fn bench_resample_64(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let image = Image::new(64, random_field(64 * 64, 9)).unwrap();

    c.bench_function("resample_64_reference", |b| {
        b.iter(|| {
            let values = grid
                .resample_image(&image, Point2::new(8.0, 8.0), Point2::ZERO)
                .unwrap();
            black_box(values.len());
        });
    });
}

criterion_group!(
    benches,
    bench_convolve_reference,
    bench_convolve_stress,
    bench_resample_64
);
criterion_main!(benches);
