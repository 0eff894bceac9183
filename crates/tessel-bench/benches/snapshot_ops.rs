//! Criterion benchmarks for snapshot encoding and decoding.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessel_bench::reference_profile;
use tessel_grid::HexLattice;
use tessel_snapshot::{grid_hash, SnapshotReader, SnapshotWriter};

/// Benchmark: encode the reference profile to memory.
fn bench_write_reference(c: &mut Criterion) {
    let grid = reference_profile().unwrap();

    c.bench_function("snapshot_write_reference", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            SnapshotWriter::new(&mut buf).write_grid(&grid).unwrap();
            black_box(buf.len());
        });
    });
}

/// Benchmark: decode and rebuild the reference profile.
fn bench_read_reference(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let mut buf = Vec::new();
    SnapshotWriter::new(&mut buf).write_grid(&grid).unwrap();

    c.bench_function("snapshot_read_reference", |b| {
        b.iter(|| {
            let back = SnapshotReader::open(buf.as_slice())
                .unwrap()
                .read_grid::<HexLattice>()
                .unwrap();
            black_box(back.len());
        });
    });
}

/// Benchmark: fingerprint the reference profile's dense export.
fn bench_grid_hash(c: &mut Criterion) {
    let grid = reference_profile().unwrap();

    c.bench_function("grid_hash_reference", |b| {
        b.iter(|| black_box(grid_hash(grid.dense())));
    });
}

criterion_group!(
    benches,
    bench_write_reference,
    bench_read_reference,
    bench_grid_hash
);
criterion_main!(benches);
