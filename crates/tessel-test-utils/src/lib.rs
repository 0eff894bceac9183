//! Boundary fixtures and seeded random inputs for Tessel tests.
//!
//! Curve generators return closed polygons as open point sequences (the
//! first and last points are distinct), sampled finely enough for boundary
//! fitting when `spacing` is at most half the grid pitch.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessel_core::Point2;

/// Number of samples so consecutive points on an arc of `length` are at
/// most `spacing` apart.
fn samples(length: f64, spacing: f64) -> usize {
    (length / spacing).ceil().max(3.0) as usize
}

/// Closed circle of `radius` around `centre`.
pub fn circle_points(radius: f64, centre: Point2, spacing: f64) -> Vec<Point2> {
    let n = samples(TAU * radius, spacing);
    (0..n)
        .map(|i| {
            let phi = TAU * i as f64 / n as f64;
            Point2::new(centre.x + radius * phi.cos(), centre.y + radius * phi.sin())
        })
        .collect()
}

/// Upper half of a circle: an open curve that cannot close into a ring.
pub fn open_arc_points(radius: f64, centre: Point2, spacing: f64) -> Vec<Point2> {
    let n = samples(PI * radius, spacing);
    (0..=n)
        .map(|i| {
            let phi = PI * i as f64 / n as f64;
            Point2::new(centre.x + radius * phi.cos(), centre.y + radius * phi.sin())
        })
        .collect()
}

/// Closed axis-aligned ellipse with semi-axes `a` and `b`.
pub fn ellipse_points(a: f64, b: f64, centre: Point2, spacing: f64) -> Vec<Point2> {
    let n = samples(TAU * a.max(b), spacing);
    (0..n)
        .map(|i| {
            let phi = TAU * i as f64 / n as f64;
            Point2::new(centre.x + a * phi.cos(), centre.y + b * phi.sin())
        })
        .collect()
}

/// Closed axis-aligned square of side `side`, anticlockwise from the
/// bottom-left corner.
pub fn square_points(side: f64, centre: Point2, spacing: f64) -> Vec<Point2> {
    let h = side / 2.0;
    let corners = [
        Point2::new(centre.x - h, centre.y - h),
        Point2::new(centre.x + h, centre.y - h),
        Point2::new(centre.x + h, centre.y + h),
        Point2::new(centre.x - h, centre.y + h),
    ];
    let per_side = samples(side, spacing);
    let mut out = Vec::with_capacity(4 * per_side);
    for i in 0..4 {
        let (from, to) = (corners[i], corners[(i + 1) % 4]);
        for k in 0..per_side {
            out.push(from + (to - from) * (k as f64 / per_side as f64));
        }
    }
    out
}

/// Two separate circles in one sequence: fits to a disconnected set of
/// boundary elements.
pub fn two_circles_points(radius: f64, separation: f64, spacing: f64) -> Vec<Point2> {
    let mut pts = circle_points(radius, Point2::new(-separation / 2.0, 0.0), spacing);
    pts.extend(circle_points(radius, Point2::new(separation / 2.0, 0.0), spacing));
    pts
}

/// `n` shifts with magnitude below `max_magnitude` in uniformly random
/// directions.
pub fn random_shifts(n: usize, max_magnitude: f64, seed: u64) -> Vec<Point2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mag = rng.random_range(0.0..max_magnitude);
            let theta = rng.random_range(0.0..TAU);
            Point2::new(mag * theta.cos(), mag * theta.sin())
        })
        .collect()
}

/// `n` values in `[0.1, 1.0)`.
pub fn random_field(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(0.1..1.0)).collect()
}

/// Install a fmt subscriber writing through the test harness. Safe to call
/// from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
