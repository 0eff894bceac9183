//! The [`Grid`]: a lattice tiling plus its fitted boundary and dense export.

use smallvec::SmallVec;
use tessel_core::{
    ElementFlags, ElementId, GridError, LatticeCoord, Point2, ScalarRange, NO_NEIGHBOUR,
};
use tracing::info;

use crate::arena::ElementArena;
use crate::boundary::{nearest_element, trace_ring};
use crate::config::{DomainShape, GridConfig};
use crate::dense::DenseGrid;
use crate::domain::Extents;
use crate::element::{GridElement, MAX_DEGREE};
use crate::hex::HexLattice;
use crate::lattice::Lattice;
use crate::rect::RectLattice;

/// A hexagonal grid.
pub type HexGrid = Grid<HexLattice>;

/// A rectangular grid.
pub type RectGrid = Grid<RectLattice>;

/// A planar tiling of hexagons or rectangles.
///
/// A grid starts as the full regular tiling described by its
/// [`GridConfig`]. Fitting a boundary flags a closed ring of elements, marks
/// the interior and discards elements outside the configured domain. After
/// construction and after every reduction the elements are in raster order
/// (rows bottom to top, left to right within a row) and the dense export is
/// rebuilt, so an [`ElementId`]'s index is its dense index.
///
/// # Examples
///
/// ```
/// use tessel_core::Point2;
/// use tessel_grid::{GridConfig, HexGrid};
///
/// let mut grid = HexGrid::new(GridConfig::hex(0.5, 10.0)).unwrap();
/// grid.set_circular_boundary(2.0, Point2::ZERO).unwrap();
/// let dense = grid.dense();
/// assert_eq!(dense.len(), grid.len());
/// assert!(dense.dist_to_boundary().iter().all(|&d| d >= 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Grid<L: Lattice> {
    pub(crate) config: GridConfig,
    pub(crate) lattice: L,
    pub(crate) arena: ElementArena,
    pub(crate) boundary: Vec<LatticeCoord>,
    pub(crate) centroid: Point2,
    pub(crate) original_centroid: Point2,
    pub(crate) enclosed_tiles: f64,
    pub(crate) extents: Option<Extents>,
    pub(crate) dense: DenseGrid,
}

impl<L: Lattice> Grid<L> {
    /// Build the full regular tiling for `config`.
    ///
    /// # Errors
    ///
    /// [`GridError::Configuration`] if the config is invalid for this
    /// lattice or the tiling would exceed `u32` element indices.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        let lattice = L::from_config(&config)?;
        let mut arena = lattice.build(&config)?;
        arena.compact(|_| true);
        let dense = DenseGrid::export(&arena, &lattice, config.z);
        info!(
            kind = %L::KIND,
            elements = arena.len(),
            pitch = lattice.pitch(),
            "grid built"
        );
        let enclosed_tiles = arena.len() as f64;
        Ok(Self {
            config,
            lattice,
            arena,
            boundary: Vec::new(),
            centroid: Point2::ZERO,
            original_centroid: Point2::ZERO,
            enclosed_tiles,
            extents: None,
            dense,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The configuration the grid was built from.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Lattice geometry.
    pub fn lattice(&self) -> &L {
        &self.lattice
    }

    /// Element storage.
    pub fn arena(&self) -> &ElementArena {
        &self.arena
    }

    /// Flat export for numeric consumers.
    pub fn dense(&self) -> &DenseGrid {
        &self.dense
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// `true` if no elements remain.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Centre-to-centre spacing along a row.
    pub fn pitch(&self) -> f64 {
        self.lattice.pitch()
    }

    /// Row spacing.
    pub fn row_pitch(&self) -> f64 {
        self.lattice.row_pitch()
    }

    /// Horizontal span of the initial tiling.
    pub fn span(&self) -> f64 {
        self.config.span_x
    }

    /// Common z coordinate.
    pub fn z(&self) -> f64 {
        self.config.z
    }

    /// Area of one tile.
    pub fn element_area(&self) -> f64 {
        self.lattice.tile_area()
    }

    /// Element by id.
    pub fn element(&self, id: ElementId) -> Option<&GridElement> {
        self.arena.get(id)
    }

    /// Element id at lattice coordinate `c`.
    pub fn find(&self, c: LatticeCoord) -> Option<ElementId> {
        self.arena.find(c)
    }

    /// Lattice coordinates of the boundary ring, in traversal order.
    pub fn boundary_coords(&self) -> &[LatticeCoord] {
        &self.boundary
    }

    /// Dense indices of the boundary ring, in traversal order.
    pub fn boundary_sequence(&self) -> Vec<u32> {
        self.boundary
            .iter()
            .filter_map(|&c| self.arena.find(c))
            .map(|id| id.0)
            .collect()
    }

    /// Centroid of the boundary as applied.
    pub fn centroid(&self) -> Point2 {
        self.centroid
    }

    /// Centroid of the boundary points as supplied, before any recentring.
    pub fn original_centroid(&self) -> Point2 {
        self.original_centroid
    }

    /// Area enclosed by the boundary curve, in units of
    /// [`element_area`](Self::element_area).
    ///
    /// Interior elements count whole; each boundary element counts the share
    /// of its tile that lies inside the curve. [`len`](Self::len) keeps every
    /// boundary element whole, so on small domains it overstates the
    /// enclosed area by up to half a ring. Without a fitted curve (a fresh
    /// grid, or after
    /// [`set_boundary_on_outer_edge`](Self::set_boundary_on_outer_edge))
    /// this equals the element count.
    pub fn enclosed_tiles(&self) -> f64 {
        self.enclosed_tiles
    }

    /// Buffered boundary extents, present for non-boundary domain shapes.
    pub fn extents(&self) -> Option<&Extents> {
        self.extents.as_ref()
    }

    /// Range of element x centres.
    pub fn x_range(&self) -> ScalarRange {
        self.dense.x_range()
    }

    /// Range of element y centres.
    pub fn y_range(&self) -> ScalarRange {
        self.dense.y_range()
    }

    /// Smallest element x centre.
    pub fn x_min(&self) -> f64 {
        self.x_range().min
    }

    /// Largest element x centre.
    pub fn x_max(&self) -> f64 {
        self.x_range().max
    }

    /// Metric width: of the buffered extents when present, otherwise of the
    /// element centres.
    pub fn width(&self) -> f64 {
        self.extents
            .map_or_else(|| self.x_range().span(), |e| e.width())
    }

    /// Metric depth, analogous to [`width`](Self::width).
    pub fn depth(&self) -> f64 {
        self.extents
            .map_or_else(|| self.y_range().span(), |e| e.depth())
    }

    /// The element at the lattice origin, or the one nearest the origin once
    /// the origin has been discarded.
    pub fn centre_element(&self) -> Option<ElementId> {
        self.arena
            .find(LatticeCoord::ORIGIN)
            .or_else(|| nearest_element(&self.arena, self.lattice.position(LatticeCoord::ORIGIN)))
    }

    // ── Neighbour hopping ──────────────────────────────────────────

    /// Follow neighbour links from `from` by `da` steps along the first
    /// lattice axis and `db` along the second.
    ///
    /// Steps alternate: an `a` step is tried first, then a `b` step if the
    /// `a` step is missing, so irregular edges are walked around where
    /// possible. Returns `None` when neither remaining step exists.
    pub fn hop(&self, from: ElementId, da: i32, db: i32) -> Option<ElementId> {
        let [pa, na, pb, nb] = L::HOPS;
        let (mut ra, mut rb) = (da, db);
        let mut cur = from;
        while ra != 0 || rb != 0 {
            let a_dir = (ra != 0).then(|| if ra > 0 { pa } else { na });
            let b_dir = (rb != 0).then(|| if rb > 0 { pb } else { nb });
            let e = self.arena.get(cur)?;
            if let Some(next) = a_dir.and_then(|d| e.neighbour(d)) {
                cur = next;
                ra -= ra.signum();
            } else if let Some(next) = b_dir.and_then(|d| e.neighbour(d)) {
                cur = next;
                rb -= rb.signum();
            } else {
                return None;
            }
        }
        Some(cur)
    }

    pub(crate) fn refresh_dense(&mut self) {
        self.dense = DenseGrid::export(&self.arena, &self.lattice, self.config.z);
    }

    // ── Reconstruction ─────────────────────────────────────────────

    /// Decompose into plain records for persistence.
    pub fn to_parts(&self) -> GridParts {
        let elements = self
            .arena
            .elements()
            .iter()
            .map(|e| ElementRecord {
                coord: e.coord(),
                position: e.position(),
                flags: e.flags(),
                dist_to_boundary: e.dist_to_boundary(),
                neighbours: (0..L::DEGREE)
                    .map(|dir| e.neighbour(dir).map_or(NO_NEIGHBOUR, |id| id.0))
                    .collect(),
            })
            .collect();
        GridParts {
            config: self.config.clone(),
            centroid: self.centroid,
            original_centroid: self.original_centroid,
            enclosed_tiles: self.enclosed_tiles,
            elements,
        }
    }

    /// Rebuild a grid from records produced by [`to_parts`](Self::to_parts).
    ///
    /// # Errors
    ///
    /// [`GridError::Configuration`] for an invalid config or elements out of
    /// raster order, [`GridError::SizeMismatch`] for a neighbour record of
    /// the wrong length, [`GridError::LoadIntegrity`] for a neighbour
    /// index that is out of range or not reciprocated, and
    /// [`GridError::BoundaryNotContiguous`] when the boundary-flagged
    /// elements do not close into one ring.
    pub fn from_parts(parts: GridParts) -> Result<Self, GridError> {
        let lattice = L::from_config(&parts.config)?;
        let n = parts.elements.len();
        if n >= u32::MAX as usize {
            return Err(GridError::config(format!("{n} elements exceed u32 range")));
        }

        let mut elements = Vec::with_capacity(n);
        for (i, rec) in parts.elements.iter().enumerate() {
            if rec.neighbours.len() != L::DEGREE {
                return Err(GridError::SizeMismatch {
                    what: "neighbour record",
                    expected: L::DEGREE,
                    found: rec.neighbours.len(),
                });
            }
            if i > 0 && parts.elements[i - 1].coord >= rec.coord {
                return Err(GridError::config(format!(
                    "element {i} at {} is out of raster order",
                    rec.coord
                )));
            }
            let mut e = GridElement::new(rec.coord, rec.position);
            e.flags = rec.flags;
            e.dist_to_boundary = rec.dist_to_boundary;
            for (dir, &nb) in rec.neighbours.iter().enumerate() {
                if nb == NO_NEIGHBOUR {
                    continue;
                }
                let back = parts
                    .elements
                    .get(nb as usize)
                    .and_then(|other| other.neighbours.get(L::opposite(dir)).copied());
                if back != Some(i as u32) {
                    return Err(GridError::LoadIntegrity {
                        element: i as u32,
                        direction: dir,
                        neighbour: nb,
                    });
                }
                e.neighbours[dir] = Some(ElementId(nb));
            }
            elements.push(e);
        }
        let arena = ElementArena::from_elements(L::DEGREE, elements);

        let members: indexmap::IndexSet<ElementId> = arena
            .iter()
            .filter(|(_, e)| e.is_boundary())
            .map(|(id, _)| id)
            .collect();
        let ring = match members.last() {
            Some(&start) => trace_ring(&arena, &members, start)?,
            None => Vec::new(),
        };
        let boundary = ring.iter().map(|&id| arena[id].coord()).collect();
        let extents = match parts.config.domain_shape {
            DomainShape::Boundary => None,
            _ => Extents::of_boundary(&arena, &lattice, &parts.config),
        };
        let dense = DenseGrid::export(&arena, &lattice, parts.config.z);
        Ok(Self {
            config: parts.config,
            lattice,
            arena,
            boundary,
            centroid: parts.centroid,
            original_centroid: parts.original_centroid,
            enclosed_tiles: parts.enclosed_tiles,
            extents,
            dense,
        })
    }

    /// Count of elements carrying every bit of `flag`.
    pub fn count_with(&self, flag: ElementFlags) -> usize {
        self.arena
            .elements()
            .iter()
            .filter(|e| e.flags().contains(flag))
            .count()
    }
}

/// A grid decomposed into plain records.
#[derive(Clone, Debug, PartialEq)]
pub struct GridParts {
    /// Build parameters.
    pub config: GridConfig,
    /// Centroid of the boundary as applied.
    pub centroid: Point2,
    /// Centroid of the boundary as supplied.
    pub original_centroid: Point2,
    /// Enclosed area in tiles.
    pub enclosed_tiles: f64,
    /// Elements in dense order.
    pub elements: Vec<ElementRecord>,
}

/// One element as stored.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementRecord {
    /// Lattice coordinate.
    pub coord: LatticeCoord,
    /// Metric centre.
    pub position: Point2,
    /// Flag set.
    pub flags: ElementFlags,
    /// Distance to the boundary.
    pub dist_to_boundary: f64,
    /// Dense neighbour index per direction, [`NO_NEIGHBOUR`] where absent.
    pub neighbours: SmallVec<[u32; MAX_DEGREE]>,
}
