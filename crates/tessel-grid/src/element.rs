//! A single grid tile.

use tessel_core::{ElementFlags, ElementId, LatticeCoord, Point2};

/// Upper bound on neighbour directions over all lattices (rect has 8).
pub const MAX_DEGREE: usize = 8;

/// Boundary distance of an element that has not been measured, or that lies
/// outside the boundary.
pub const DISTANCE_UNSET: f64 = -100.0;

/// One tile of a grid: a hexagon or a rectangle.
///
/// The stable identity of an element is its [`LatticeCoord`]; its
/// [`ElementId`] is a slot in the owning arena and changes when the grid is
/// reduced. After every reduction the arena is in raster order, so the slot
/// of a live element equals its dense index.
#[derive(Clone, Debug, PartialEq)]
pub struct GridElement {
    pub(crate) coord: LatticeCoord,
    pub(crate) position: Point2,
    pub(crate) neighbours: [Option<ElementId>; MAX_DEGREE],
    pub(crate) flags: ElementFlags,
    pub(crate) dist_to_boundary: f64,
}

impl GridElement {
    pub(crate) fn new(coord: LatticeCoord, position: Point2) -> Self {
        Self {
            coord,
            position,
            neighbours: [None; MAX_DEGREE],
            flags: ElementFlags::empty(),
            dist_to_boundary: DISTANCE_UNSET,
        }
    }

    /// Integer lattice coordinates.
    pub fn coord(&self) -> LatticeCoord {
        self.coord
    }

    /// Metric centre of the tile.
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Neighbour in direction `dir`, if any.
    pub fn neighbour(&self, dir: usize) -> Option<ElementId> {
        self.neighbours.get(dir).copied().flatten()
    }

    /// All neighbour slots; only the first `degree` are meaningful.
    pub fn neighbours(&self) -> &[Option<ElementId>; MAX_DEGREE] {
        &self.neighbours
    }

    /// Number of present neighbours among the first `degree` directions.
    pub fn neighbour_count(&self, degree: usize) -> usize {
        self.neighbours[..degree].iter().flatten().count()
    }

    /// Flag set.
    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    /// `true` if the element lies on the fitted boundary.
    pub fn is_boundary(&self) -> bool {
        self.flags.contains(ElementFlags::IS_BOUNDARY)
    }

    /// `true` if the element lies on or inside the fitted boundary.
    pub fn inside_boundary(&self) -> bool {
        self.flags.contains(ElementFlags::INSIDE_BOUNDARY)
    }

    /// Distance to the nearest boundary element, [`DISTANCE_UNSET`] outside.
    pub fn dist_to_boundary(&self) -> f64 {
        self.dist_to_boundary
    }

    /// Euclidean distance between tile centres.
    pub fn distance_from(&self, other: &GridElement) -> f64 {
        self.position.distance(other.position)
    }
}
