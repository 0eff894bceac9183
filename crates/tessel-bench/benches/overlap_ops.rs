//! Criterion benchmarks for overlap geometry and field shifting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessel_bench::{rect_profile, reference_profile};
use tessel_test_utils::{random_field, random_shifts};

/// Benchmark: overlap fractions for 1000 random sub-pitch hex shifts.
fn bench_hex_overlap_1000(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let shifts = random_shifts(1000, grid.pitch(), 17);

    c.bench_function("hex_overlap_1000", |b| {
        b.iter(|| {
            for &s in &shifts {
                black_box(grid.overlap_for_shift(s));
            }
        });
    });
}

/// Benchmark: closed-form rect overlap for the same shift set.
fn bench_rect_overlap_1000(c: &mut Criterion) {
    let grid = rect_profile().unwrap();
    let shifts = random_shifts(1000, grid.pitch(), 17);

    c.bench_function("rect_overlap_1000", |b| {
        b.iter(|| {
            for &s in &shifts {
                black_box(grid.overlap_for_shift(s));
            }
        });
    });
}

/// Benchmark: shift a dense field across the reference profile.
fn bench_shift_field(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let data = random_field(grid.len(), 3);
    let shift = tessel_core::Point2::new(0.037, -0.021);

    c.bench_function("shift_field_reference", |b| {
        b.iter(|| {
            let shifted = grid.shift_field(&data, shift).unwrap();
            black_box(shifted.mass_lost);
        });
    });
}

criterion_group!(
    benches,
    bench_hex_overlap_1000,
    bench_rect_overlap_1000,
    bench_shift_field
);
criterion_main!(benches);
