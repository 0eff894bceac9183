//! Benchmark profiles for the Tessel grid engine.
//!
//! - [`reference_profile`]: hex grid of pitch 0.1 fitted to a circle of
//!   radius 4 (about 5,900 elements)
//! - [`stress_profile`]: the same circle at pitch 0.025 (about 93,000
//!   elements)
//! - [`rect_profile`]: unit-pitch Cartesian grid fitted to a circle of
//!   radius 40
//! - [`unit_ring_kernel`]: a one-ring hex kernel with unit weights

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tessel_core::{GridError, Point2};
use tessel_grid::{GridConfig, HexGrid, RectGrid};

/// Reference hex profile: pitch 0.1, circle of radius 4 on a span of 10.
pub fn reference_profile() -> Result<HexGrid, GridError> {
    fitted_hex(0.1, 10.0, 4.0)
}

/// Stress hex profile: pitch 0.025, circle of radius 4 on a span of 10.
pub fn stress_profile() -> Result<HexGrid, GridError> {
    fitted_hex(0.025, 10.0, 4.0)
}

/// Cartesian profile: unit pitch, circle of radius 40 on a span of 100.
pub fn rect_profile() -> Result<RectGrid, GridError> {
    let mut grid = RectGrid::new(GridConfig::square(1.0, 100.0))?;
    grid.set_circular_boundary(40.0, Point2::ZERO)?;
    Ok(grid)
}

/// Seven-element kernel of pitch `d` with unit weights.
pub fn unit_ring_kernel(d: f64) -> Result<(HexGrid, Vec<f64>), GridError> {
    let kernel = HexGrid::new(GridConfig::hex(d, 2.0 * d))?;
    let weights = vec![1.0; kernel.len()];
    Ok((kernel, weights))
}

fn fitted_hex(d: f64, span: f64, radius: f64) -> Result<HexGrid, GridError> {
    let mut grid = HexGrid::new(GridConfig::hex(d, span))?;
    grid.set_circular_boundary(radius, Point2::ZERO)?;
    Ok(grid)
}
