//! Hexagonal and Cartesian grid topology for field simulations.
//!
//! A [`Grid`] starts as a regular tiling of hexagons ([`HexLattice`]) or
//! rectangles ([`RectLattice`]) centred on the origin. A closed curve fitted
//! with [`Grid::set_boundary`] reduces it to an irregular domain; the
//! survivors are exported as flat, index-aligned arrays ([`DenseGrid`]) for
//! numeric code.
//!
//! # Numerics
//!
//! - [`convolve()`]: discrete convolution against a kernel grid of equal pitch
//! - [`Grid::shift_field`]: translate a field by a real vector, splitting
//!   each tile's content by exact overlap fractions ([`Overlap`])
//! - [`Grid::resample_image`]: Gaussian resampling of a pixel [`Image`]
//! - [`Grid::region`]: elements enclosed by a secondary curve

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod boundary;
pub mod config;
pub mod convolve;
pub mod dense;
pub mod domain;
pub mod element;
pub mod grid;
pub mod hex;
mod interior;
pub mod lattice;
pub mod overlap;
mod parallel;
pub mod rect;
pub mod region;
pub mod resample;

#[cfg(test)]
pub(crate) mod compliance;

pub use arena::ElementArena;
pub use boundary::{ellipse_points, polygon_contains, rectangle_points};
pub use config::{DomainShape, GridConfig, WrapMode, DEFAULT_BOUNDARY_MEMORY};
pub use convolve::{convolve, convolve_into};
pub use dense::DenseGrid;
pub use domain::Extents;
pub use element::{GridElement, DISTANCE_UNSET, MAX_DEGREE};
pub use grid::{ElementRecord, Grid, GridParts, HexGrid, RectGrid};
pub use hex::HexLattice;
pub use lattice::{Lattice, LatticeKind};
pub use overlap::{
    segment_intersection, LatticeShift, Overlap, OverlapCase, OverlapStatus, ShiftedField,
};
pub use rect::RectLattice;
pub use region::Region;
pub use resample::Image;
