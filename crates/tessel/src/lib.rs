//! Tessel: hexagonal and Cartesian grid topology for field simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessel sub-crates. For most users, adding `tessel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessel::prelude::*;
//!
//! // A hex grid of pitch 0.25 fitted to a circle of radius 3.
//! let mut grid = HexGrid::new(GridConfig::hex(0.25, 8.0)).unwrap();
//! grid.set_circular_boundary(3.0, Point2::ZERO).unwrap();
//!
//! // Smooth a field with a one-ring kernel.
//! let kernel = HexGrid::new(GridConfig::hex(0.25, 0.5)).unwrap();
//! let weights = vec![1.0 / 7.0; kernel.len()];
//! let data = vec![1.0; grid.len()];
//! let smoothed = convolve(&grid, &kernel, &weights, &data).unwrap();
//! assert_eq!(smoothed.len(), grid.len());
//!
//! // Overlap fractions for a sub-pitch shift always cover one tile.
//! let (_, overlap) = grid.overlap_for_shift(Point2::new(0.1, 0.05));
//! assert!((overlap.total() - 1.0).abs() < 1e-5);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessel-core` | Points, ranges, flags, ids, `GridError` |
//! | [`grid`] | `tessel-grid` | Lattices, grids, boundary fitting, overlap, convolution, resampling |
//! | [`snapshot`] | `tessel-snapshot` | Binary persistence |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and the error taxonomy (`tessel-core`).
pub use tessel_core as types;

/// Lattices, grids and every operation on them (`tessel-grid`).
///
/// [`grid::Grid`] is generic over [`grid::Lattice`]; use the
/// [`grid::HexGrid`] and [`grid::RectGrid`] aliases.
pub use tessel_grid as grid;

/// Binary persistence (`tessel-snapshot`).
///
/// [`snapshot::save`] and [`snapshot::load`] for files,
/// [`snapshot::SnapshotWriter`] and [`snapshot::SnapshotReader`] for
/// arbitrary streams.
pub use tessel_snapshot as snapshot;

/// Common imports for typical Tessel usage.
///
/// ```rust
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tessel_core::{ElementFlags, ElementId, LatticeCoord, Point2, ScalarRange};

    // Errors
    pub use tessel_core::GridError;
    pub use tessel_snapshot::SnapshotError;

    // Grid
    pub use tessel_grid::{
        convolve, convolve_into, DenseGrid, DomainShape, Grid, GridConfig, HexGrid, HexLattice,
        Image, Lattice, LatticeKind, Overlap, OverlapCase, RectGrid, RectLattice, Region,
        WrapMode,
    };
}
