//! Standard scenarios shared by integration tests and benchmarks.
//!
//! Each scenario names the grid parameters and boundary it is fitted with,
//! so a test and a benchmark that mention the same scenario exercise the
//! same geometry.

use tessel_core::Point2;

use crate::{circle_points, ellipse_points, square_points};

/// Grid parameters plus a closed boundary curve.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    /// Element pitch.
    pub pitch: f64,
    /// Full width and height of the initial lattice.
    pub span: f64,
    pub boundary: Vec<Point2>,
}

impl Scenario {
    /// Circle of radius `40 * pitch` on a span of `10` with pitch `0.1`.
    pub fn large_circle() -> Self {
        let pitch = 0.1;
        Self {
            name: "large_circle",
            pitch,
            span: 10.0,
            boundary: circle_points(40.0 * pitch, Point2::ZERO, pitch / 2.0),
        }
    }

    /// Circle of radius `5` on a unit-pitch span of `12`.
    pub fn small_circle() -> Self {
        Self {
            name: "small_circle",
            pitch: 1.0,
            span: 12.0,
            boundary: circle_points(5.0, Point2::ZERO, 0.5),
        }
    }

    /// Off-centre ellipse with a 2:1 aspect ratio.
    pub fn ellipse() -> Self {
        Self {
            name: "ellipse",
            pitch: 0.5,
            span: 20.0,
            boundary: ellipse_points(6.0, 3.0, Point2::new(1.0, -0.5), 0.25),
        }
    }

    /// Square of side `8` centred on the origin.
    pub fn square() -> Self {
        Self {
            name: "square",
            pitch: 0.5,
            span: 16.0,
            boundary: square_points(8.0, Point2::ZERO, 0.25),
        }
    }

    /// Every closed scenario above.
    pub fn all() -> Vec<Self> {
        vec![
            Self::small_circle(),
            Self::large_circle(),
            Self::ellipse(),
            Self::square(),
        ]
    }

    /// Area enclosed by the boundary polygon.
    pub fn enclosed_area(&self) -> f64 {
        let n = self.boundary.len();
        let twice: f64 = (0..n)
            .map(|i| self.boundary[i].cross(self.boundary[(i + 1) % n]))
            .sum();
        twice.abs() / 2.0
    }
}
