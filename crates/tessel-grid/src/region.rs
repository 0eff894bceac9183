//! Region queries: the elements inside an arbitrary closed curve, without
//! reducing the grid.

use indexmap::IndexSet;
use tessel_core::{ElementFlags, ElementId, Point2};
use tracing::{debug, warn};

use crate::boundary::{fit, interior_seed, trace_ring};
use crate::config::WrapMode;
use crate::grid::Grid;
use crate::interior::InteriorMarker;
use crate::lattice::Lattice;

/// Elements enclosed by a region curve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    /// Dense indices of elements on or inside the region ring, ascending.
    pub elements: Vec<u32>,
    /// Centroid of the region curve as fitted.
    pub centroid: Point2,
}

impl Region {
    /// `true` if no element was selected.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<L: Lattice> Grid<L> {
    /// Select the elements enclosed by `points`.
    ///
    /// Previous region flags are cleared first. With
    /// `apply_original_centroid` the points are shifted by the same
    /// translation that recentred the domain boundary, so a region drawn in
    /// the boundary's original frame lines up with the grid. A curve that
    /// does not fit to one closed ring yields an empty region.
    pub fn region(&mut self, points: &[Point2], apply_original_centroid: bool) -> Region {
        self.clear_region_flags();
        if points.is_empty() || self.config.wrap != WrapMode::None {
            return Region::default();
        }
        let shift = if apply_original_centroid {
            self.original_centroid - self.centroid
        } else {
            Point2::ZERO
        };
        let pts: Vec<Point2> = points.iter().map(|&p| p - shift).collect();
        let Some(seed) = self.centre_element() else {
            return Region::default();
        };

        let fitted = fit(&self.arena, &pts, seed);
        let members: IndexSet<ElementId> = fitted.iter().copied().collect();
        let start = fitted[fitted.len() - 1];
        if let Err(err) = trace_ring(&self.arena, &members, start) {
            warn!(%err, "region curve rejected");
            return Region::default();
        }

        for &id in &members {
            self.arena
                .get_mut(id)
                .flags
                .insert(ElementFlags::IS_REGION_BOUNDARY | ElementFlags::INSIDE_REGION);
        }
        let seed = interior_seed(&self.arena, &pts, ElementFlags::IS_REGION_BOUNDARY);
        InteriorMarker::region(self.config.boundary_memory).mark::<L>(&mut self.arena, seed);
        self.refresh_dense();

        let elements = self.dense.indices_with(ElementFlags::INSIDE_REGION);
        debug!(ring = members.len(), elements = elements.len(), "region selected");
        Region {
            elements,
            centroid: Point2::centroid(&pts),
        }
    }

    /// Remove region flags from every element.
    pub fn clear_region_flags(&mut self) {
        let clear = ElementFlags::IS_REGION_BOUNDARY | ElementFlags::INSIDE_REGION;
        let mut touched = false;
        for e in self.arena.elements_mut() {
            touched |= e.flags.intersects(clear);
            e.flags.remove(clear);
        }
        if touched {
            self.refresh_dense();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::hex::HexLattice;
    use tessel_test_utils::{circle_points, open_arc_points};

    fn grid() -> Grid<HexLattice> {
        let mut g = Grid::new(GridConfig::hex(0.5, 20.0)).unwrap();
        g.set_circular_boundary(8.0, Point2::ZERO).unwrap();
        g
    }

    #[test]
    fn region_is_subset_of_domain() {
        let mut g = grid();
        let n = g.len();
        let r = g.region(&circle_points(2.0, Point2::new(1.0, 1.0), 0.2), false);
        assert!(!r.is_empty());
        assert_eq!(g.len(), n);
        assert!(r.elements.windows(2).all(|w| w[0] < w[1]));
        for &i in &r.elements {
            let p = Point2::new(g.dense().x()[i as usize], g.dense().y()[i as usize]);
            assert!(p.distance(Point2::new(1.0, 1.0)) < 2.0 + 0.5);
        }
    }

    #[test]
    fn region_count_tracks_area() {
        let mut g = grid();
        let r = g.region(&circle_points(3.0, Point2::ZERO, 0.2), false);
        let expected = std::f64::consts::PI * 9.0 / g.element_area();
        let ratio = r.elements.len() as f64 / expected;
        assert!((0.95..1.3).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn open_curve_gives_empty_region() {
        let mut g = grid();
        let r = g.region(&open_arc_points(2.0, Point2::ZERO, 0.2), false);
        assert!(r.is_empty());
        assert_eq!(g.count_with(ElementFlags::INSIDE_REGION), 0);
    }

    #[test]
    fn new_region_replaces_old() {
        let mut g = grid();
        g.region(&circle_points(2.0, Point2::new(-3.0, 0.0), 0.2), false);
        let second = g.region(&circle_points(1.0, Point2::new(3.0, 0.0), 0.2), false);
        assert_eq!(g.count_with(ElementFlags::INSIDE_REGION), second.elements.len());
        assert!(second
            .elements
            .iter()
            .all(|&i| g.dense().x()[i as usize] > 1.0));
    }

    #[test]
    fn original_centroid_shift_applied() {
        let mut g = Grid::<HexLattice>::new(GridConfig::hex(0.5, 20.0)).unwrap();
        let offset = Point2::new(10.0, 5.0);
        g.set_boundary(&circle_points(6.0, offset, 0.2), true).unwrap();
        let r = g.region(&circle_points(1.5, offset, 0.2), true);
        assert!(r.centroid.length() < 1e-9);
        let plain = g.region(&circle_points(1.5, Point2::ZERO, 0.2), false);
        assert_eq!(r.elements, plain.elements);
    }
}
