//! The [`Lattice`] trait: the seam between lattice-specific geometry and the
//! lattice-agnostic grid machinery.
//!
//! A lattice knows how lattice coordinates map to metric positions, how its
//! neighbour directions are laid out, what one tile looks like, and how to
//! build the full regular tiling. Everything else (boundary fitting,
//! interior marking, reduction, dense export, convolution, resampling) is
//! written once against this trait.

use std::fmt;

use smallvec::SmallVec;
use tessel_core::{GridError, LatticeCoord, Point2};

use crate::arena::ElementArena;
use crate::config::GridConfig;
use crate::overlap::Overlap;

/// Which family a lattice belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LatticeKind {
    /// Pointy-top hexagons, six neighbours.
    Hex,
    /// Rectangles, eight neighbours.
    Rect,
}

impl LatticeKind {
    /// Stable tag used by the persisted layout.
    pub fn tag(self) -> u8 {
        match self {
            Self::Hex => 1,
            Self::Rect => 2,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Hex),
            2 => Some(Self::Rect),
            _ => None,
        }
    }
}

impl fmt::Display for LatticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Rect => write!(f, "rect"),
        }
    }
}

/// Lattice-specific geometry and tiling construction.
///
/// Directions are numbered anticlockwise starting from east, so the
/// opposite of direction `i` is `(i + DEGREE / 2) % DEGREE`.
pub trait Lattice: Clone + fmt::Debug + Send + Sync + 'static {
    /// Lattice family.
    const KIND: LatticeKind;
    /// Number of neighbour directions.
    const DEGREE: usize;
    /// Lattice-coordinate offset of the neighbour in each direction.
    const OFFSETS: &'static [(i32, i32)];
    /// Directions the interior marker may march and flood along. A subset
    /// of all directions when diagonal steps could slip between two
    /// diagonally adjacent boundary elements.
    const MARCH_DIRECTIONS: &'static [usize];
    /// Direction of the first interior run from the seed element.
    const UP: usize;
    /// Directions that advance one lattice step along `+a`, `-a`, `+b`, `-b`.
    const HOPS: [usize; 4];
    /// Lattice offsets of the tiles an overlap result covers, home tile
    /// first, then the first ring in direction order, then any outer ring.
    const OVERLAP_OFFSETS: &'static [(i32, i32)];

    /// Derive the lattice geometry from a validated config.
    fn from_config(config: &GridConfig) -> Result<Self, GridError>;

    /// Centre-to-centre spacing along a row.
    fn pitch(&self) -> f64;

    /// Vertical spacing between rows.
    fn row_pitch(&self) -> f64;

    /// Metric centre of the tile at `c`.
    fn position(&self, c: LatticeCoord) -> Point2;

    /// Lattice coordinate of the tile whose cell contains `p`, on the
    /// unbounded lattice.
    fn round(&self, p: Point2) -> LatticeCoord;

    /// Tile outline around `centre`, anticlockwise.
    fn tile_vertices(&self, centre: Point2) -> SmallVec<[Point2; 6]>;

    /// Area of one tile.
    fn tile_area(&self) -> f64;

    /// Build the full regular tiling described by `config`, with every
    /// neighbour relation wired.
    fn build(&self, config: &GridConfig) -> Result<ElementArena, GridError>;

    /// Fractions of a tile translated by `remainder` that fall into each of
    /// the [`OVERLAP_OFFSETS`](Self::OVERLAP_OFFSETS) tiles.
    fn overlap(&self, remainder: Point2) -> Overlap;

    /// Direction opposite to `dir`.
    fn opposite(dir: usize) -> usize {
        (dir + Self::DEGREE / 2) % Self::DEGREE
    }

    /// Direction whose offset is `(da, db)`, if any.
    fn direction_of(da: i32, db: i32) -> Option<usize> {
        Self::OFFSETS.iter().position(|&o| o == (da, db))
    }
}
