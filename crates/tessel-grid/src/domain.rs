//! Domain reduction: which elements survive once a boundary is applied.
//!
//! With [`DomainShape::Boundary`] only elements on or inside the ring are
//! kept. The other shapes keep a buffered region around the ring (its
//! bounding rectangle, bounding lattice parallelogram, or the whole hex
//! tiling) so that fields may extend past the boundary.

use tessel_core::{ElementFlags, Point2, ScalarRange};
use tracing::debug;

use crate::arena::ElementArena;
use crate::boundary::interior_seed;
use crate::config::{DomainShape, GridConfig};
use crate::element::GridElement;
use crate::grid::Grid;
use crate::interior::{compute_distance_to_boundary, InteriorMarker};
use crate::lattice::Lattice;

/// Bounding box of the boundary ring, in metres and in lattice coordinates,
/// grown by the configured buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    /// Horizontal metric range.
    pub x: ScalarRange,
    /// Vertical metric range.
    pub y: ScalarRange,
    /// Smallest first lattice coordinate.
    pub a_min: i32,
    /// Largest first lattice coordinate.
    pub a_max: i32,
    /// Smallest second lattice coordinate.
    pub b_min: i32,
    /// Largest second lattice coordinate.
    pub b_max: i32,
}

impl Extents {
    /// Extents of the elements flagged [`ElementFlags::IS_BOUNDARY`], or
    /// `None` if there are none.
    pub(crate) fn of_boundary<L: Lattice>(
        arena: &ElementArena,
        lattice: &L,
        config: &GridConfig,
    ) -> Option<Self> {
        let mut ext = Self {
            x: ScalarRange::empty(),
            y: ScalarRange::empty(),
            a_min: i32::MAX,
            a_max: i32::MIN,
            b_min: i32::MAX,
            b_max: i32::MIN,
        };
        for e in arena.elements().iter().filter(|e| e.is_boundary()) {
            ext.x.update(e.position().x);
            ext.y.update(e.position().y);
            ext.a_min = ext.a_min.min(e.coord().a);
            ext.a_max = ext.a_max.max(e.coord().a);
            ext.b_min = ext.b_min.min(e.coord().b);
            ext.b_max = ext.b_max.max(e.coord().b);
        }
        if ext.x.is_empty() {
            return None;
        }
        let (gh, gv) = (config.growth_buffer_horz, config.growth_buffer_vert);
        ext.x = ScalarRange::new(
            ext.x.min - gh as f64 * lattice.pitch(),
            ext.x.max + gh as f64 * lattice.pitch(),
        );
        ext.y = ScalarRange::new(
            ext.y.min - gv as f64 * lattice.row_pitch(),
            ext.y.max + gv as f64 * lattice.row_pitch(),
        );
        ext.a_min -= gh;
        ext.a_max += gh;
        ext.b_min -= gv;
        ext.b_max += gv;
        Some(ext)
    }

    /// Metric width.
    pub fn width(&self) -> f64 {
        self.x.span()
    }

    /// Metric depth.
    pub fn depth(&self) -> f64 {
        self.y.span()
    }

    /// Centre of the metric box.
    pub fn centre(&self) -> Point2 {
        Point2::new(
            (self.x.min + self.x.max) / 2.0,
            (self.y.min + self.y.max) / 2.0,
        )
    }

    fn admits(&self, shape: DomainShape, e: &GridElement, tol: f64) -> bool {
        match shape {
            DomainShape::Rectangle => {
                let p = e.position();
                p.x >= self.x.min - tol
                    && p.x <= self.x.max + tol
                    && p.y >= self.y.min - tol
                    && p.y <= self.y.max + tol
            }
            DomainShape::Parallelogram => {
                let c = e.coord();
                (self.a_min..=self.a_max).contains(&c.a) && (self.b_min..=self.b_max).contains(&c.b)
            }
            DomainShape::Hexagon => true,
            DomainShape::Boundary => e.inside_boundary(),
        }
    }
}

impl<L: Lattice> Grid<L> {
    /// Mark the interior of the freshly flagged ring and discard everything
    /// outside the configured domain. `polygon` is the fitted curve, used to
    /// pick the interior seed.
    pub(crate) fn apply_domain(&mut self, polygon: &[Point2]) {
        let marker = InteriorMarker::boundary(self.config.boundary_memory);
        let shape = self.config.domain_shape;
        let removed = match shape {
            DomainShape::Boundary => {
                let seed = interior_seed(&self.arena, polygon, ElementFlags::IS_BOUNDARY);
                marker.mark::<L>(&mut self.arena, seed);
                self.extents = None;
                self.arena.compact(|e| e.inside_boundary())
            }
            _ => {
                let ext = Extents::of_boundary(&self.arena, &self.lattice, &self.config);
                let tol = 1e-9 * self.lattice.pitch();
                if let Some(ext) = ext {
                    for e in self.arena.elements_mut() {
                        if ext.admits(shape, e, tol) {
                            e.flags.insert(ElementFlags::INSIDE_DOMAIN);
                        }
                    }
                }
                self.extents = ext;
                let removed = self
                    .arena
                    .compact(|e| e.flags().contains(ElementFlags::INSIDE_DOMAIN));
                let seed = interior_seed(&self.arena, polygon, ElementFlags::IS_BOUNDARY);
                marker.mark::<L>(&mut self.arena, seed);
                removed
            }
        };
        compute_distance_to_boundary(&mut self.arena, self.config.parallel_threshold);
        self.refresh_dense();
        debug!(?shape, removed, remaining = self.arena.len(), "domain reduced");
    }
}
