//! Boundary fitting: map an arbitrary closed curve onto a ring of elements.
//!
//! Each curve point is assigned to the element whose centre is nearest,
//! found by greedy descent from the previous point's element. The resulting
//! set must form a single closed ring; a depth-first traversal over boundary
//! elements checks this before any flag is committed, so a failed fit leaves
//! the grid exactly as it was.

use indexmap::{IndexMap, IndexSet};
use tessel_core::{ElementFlags, ElementId, GridError, Point2};
use tracing::{debug, info};

use crate::arena::ElementArena;
use crate::config::WrapMode;
use crate::element::DISTANCE_UNSET;
use crate::grid::Grid;
use crate::interior;
use crate::lattice::Lattice;
use crate::overlap::{clip_convex, polygon_area};

// ── Descent ────────────────────────────────────────────────────────

/// Element nearest to `p`, by greedy descent from `start`.
///
/// Each step moves to the strictly closest neighbour that is closer than the
/// current element, so the walk never revisits an element and stops at a
/// local minimum. On a regular tiling the local minimum is the element whose
/// cell contains `p` (or the closest edge element when `p` lies off-grid).
pub fn element_near_point(arena: &ElementArena, p: Point2, start: ElementId) -> ElementId {
    let mut current = start;
    let mut best = arena[current].position().distance(p);
    loop {
        let mut next = None;
        for dir in 0..arena.degree() {
            if let Some(nb) = arena[current].neighbour(dir) {
                let d = arena[nb].position().distance(p);
                if d < best {
                    best = d;
                    next = Some(nb);
                }
            }
        }
        match next {
            Some(nb) => current = nb,
            None => return current,
        }
    }
}

/// Element whose centre is nearest `p`, by exhaustive search.
pub fn nearest_element(arena: &ElementArena, p: Point2) -> Option<ElementId> {
    arena
        .iter()
        .map(|(id, e)| (id, e.position().distance(p)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Fit every point of `points` in order, descending from the previous
/// point's element. Consecutive duplicates are collapsed.
pub(crate) fn fit(arena: &ElementArena, points: &[Point2], seed: ElementId) -> Vec<ElementId> {
    let mut current = seed;
    let mut out: Vec<ElementId> = Vec::with_capacity(points.len());
    for &p in points {
        current = element_near_point(arena, p, current);
        if out.last() != Some(&current) {
            out.push(current);
        }
    }
    out
}

// ── Contiguity ─────────────────────────────────────────────────────

/// Depth-first traversal over `members` from `start`, probing directions in
/// index order. Returns the visit order if every member is reached and the
/// traversal closes back onto `start`.
///
/// Rings of one or two elements enclose nothing but are accepted as
/// degenerate boundaries.
pub(crate) fn trace_ring(
    arena: &ElementArena,
    members: &IndexSet<ElementId>,
    start: ElementId,
) -> Result<Vec<ElementId>, GridError> {
    let degree = arena.degree();
    let mut depth: IndexMap<ElementId, usize> = IndexMap::with_capacity(members.len());
    let mut stack = vec![(start, 0usize)];
    let mut closed = members.len() < 3;

    while let Some((id, d)) = stack.pop() {
        if depth.contains_key(&id) {
            continue;
        }
        depth.insert(id, d);
        let e = &arena[id];
        if d >= 2 && (0..degree).any(|dir| e.neighbour(dir) == Some(start)) {
            closed = true;
        }
        // Reverse push so the lowest direction is explored first.
        for dir in (0..degree).rev() {
            if let Some(nb) = e.neighbour(dir) {
                if members.contains(&nb) && !depth.contains_key(&nb) {
                    stack.push((nb, d + 1));
                }
            }
        }
    }

    if depth.len() != members.len() || !closed {
        return Err(GridError::BoundaryNotContiguous {
            flagged: members.len(),
            reached: depth.len(),
        });
    }
    Ok(depth.into_keys().collect())
}

// ── Polygons ───────────────────────────────────────────────────────

/// Even-odd point-in-polygon test; the polygon is implicitly closed.
pub fn polygon_contains(polygon: &[Point2], p: Point2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Points around an ellipse with semi-axes `a` (x) and `b` (y), spaced so
/// consecutive points are no more than half a `pitch` apart.
pub fn ellipse_points(a: f64, b: f64, centre: Point2, pitch: f64) -> Vec<Point2> {
    let dphi = (pitch / 2.0).atan2(a.max(b));
    let n = (std::f64::consts::TAU / dphi).ceil().max(3.0) as usize;
    let step = std::f64::consts::TAU / n as f64;
    (0..n)
        .map(|i| {
            let phi = i as f64 * step;
            Point2::new(centre.x + a * phi.cos(), centre.y + b * phi.sin())
        })
        .collect()
}

/// Points around a `width` x `height` rectangle, anticlockwise from the
/// bottom-left corner, no more than half a `pitch` apart.
pub fn rectangle_points(width: f64, height: f64, centre: Point2, pitch: f64) -> Vec<Point2> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let corners = [
        Point2::new(centre.x - hw, centre.y - hh),
        Point2::new(centre.x + hw, centre.y - hh),
        Point2::new(centre.x + hw, centre.y + hh),
        Point2::new(centre.x - hw, centre.y + hh),
    ];
    let step = pitch / 2.0;
    let mut out = Vec::new();
    for i in 0..4 {
        let (from, to) = (corners[i], corners[(i + 1) % 4]);
        let n = (from.distance(to) / step).ceil().max(1.0) as usize;
        for k in 0..n {
            out.push(from + (to - from) * (k as f64 / n as f64));
        }
    }
    out
}

/// An element to start interior marking from: the element nearest the
/// polygon centroid when the centroid lies inside the polygon, otherwise the
/// first element (in raster order) whose centre lies inside it. Elements
/// carrying `boundary_flag` are never chosen.
pub(crate) fn interior_seed(
    arena: &ElementArena,
    polygon: &[Point2],
    boundary_flag: ElementFlags,
) -> Option<ElementId> {
    let open = |id: ElementId| {
        let e = &arena[id];
        !e.flags().contains(boundary_flag) && polygon_contains(polygon, e.position())
    };
    let c = Point2::centroid(polygon);
    if polygon_contains(polygon, c) {
        if let Some(id) = nearest_element(arena, c) {
            if open(id) {
                return Some(id);
            }
            let near = (0..arena.degree())
                .filter_map(|dir| arena[id].neighbour(dir))
                .find(|&nb| open(nb));
            if near.is_some() {
                return near;
            }
        }
    }
    arena.iter().map(|(id, _)| id).find(|&id| open(id))
}

/// Tiles' worth of area enclosed by `polygon`: one for every element inside
/// the boundary, except that boundary elements contribute only the clipped
/// share of their tile.
pub(crate) fn enclosed_tiles<L: Lattice>(
    arena: &ElementArena,
    lattice: &L,
    polygon: &[Point2],
) -> f64 {
    let area = lattice.tile_area();
    arena
        .elements()
        .iter()
        .filter(|e| e.inside_boundary())
        .map(|e| {
            if e.is_boundary() {
                let tile = lattice.tile_vertices(e.position());
                polygon_area(&clip_convex(polygon, &tile)) / area
            } else {
                1.0
            }
        })
        .sum()
}

// ── Grid operations ────────────────────────────────────────────────

impl<L: Lattice> Grid<L> {
    /// Fit a closed boundary to `points` and reduce the grid to its domain.
    ///
    /// With `recentre`, the points are first translated so their centroid
    /// sits on the origin; the translation is kept as
    /// [`original_centroid`](Self::original_centroid). Any previous boundary
    /// is cleared. Elements outside the domain selected by
    /// [`GridConfig::domain_shape`](crate::GridConfig) are discarded and the
    /// survivors renumbered.
    ///
    /// # Errors
    ///
    /// [`GridError::Configuration`] for an empty or non-finite point list or
    /// a wrapped grid; [`GridError::BoundaryNotContiguous`] when the fitted
    /// elements do not close into one ring. On error the grid is unchanged.
    pub fn set_boundary(&mut self, points: &[Point2], recentre: bool) -> Result<(), GridError> {
        if self.config.wrap != WrapMode::None {
            return Err(GridError::config(
                "boundaries cannot be fitted to a wrapped grid",
            ));
        }
        if points.is_empty() {
            return Err(GridError::config("boundary needs at least one point"));
        }
        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(GridError::config("boundary points must be finite"));
        }

        let given = Point2::centroid(points);
        let pts: Vec<Point2> = if recentre {
            points.iter().map(|&p| p - given).collect()
        } else {
            points.to_vec()
        };
        let seed = self
            .centre_element()
            .ok_or_else(|| GridError::config("grid has no elements"))?;
        let fitted = fit(&self.arena, &pts, seed);
        let members: IndexSet<ElementId> = fitted.iter().copied().collect();
        let start = fitted[fitted.len() - 1];
        let ring = trace_ring(&self.arena, &members, start)?;

        self.clear_boundary();
        for &id in &members {
            self.arena
                .get_mut(id)
                .flags
                .insert(ElementFlags::IS_BOUNDARY | ElementFlags::INSIDE_BOUNDARY);
        }
        self.boundary = ring.iter().map(|&id| self.arena[id].coord()).collect();
        self.centroid = Point2::centroid(&pts);
        self.original_centroid = given;

        let before = self.arena.len();
        self.apply_domain(&pts);
        self.enclosed_tiles = enclosed_tiles(&self.arena, &self.lattice, &pts);
        info!(
            points = points.len(),
            boundary = self.boundary.len(),
            enclosed_tiles = self.enclosed_tiles,
            removed = before - self.arena.len(),
            remaining = self.arena.len(),
            "boundary applied"
        );
        Ok(())
    }

    /// Fit a circle of `radius` around `centre`.
    pub fn set_circular_boundary(&mut self, radius: f64, centre: Point2) -> Result<(), GridError> {
        self.set_elliptical_boundary(radius, radius, centre)
    }

    /// Fit an axis-aligned ellipse with semi-axes `a` (x) and `b` (y).
    pub fn set_elliptical_boundary(
        &mut self,
        a: f64,
        b: f64,
        centre: Point2,
    ) -> Result<(), GridError> {
        if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
            return Err(GridError::config(format!(
                "ellipse semi-axes must be positive and finite, got {a} x {b}"
            )));
        }
        let step = self.lattice.pitch().min(self.lattice.row_pitch());
        self.set_boundary(&ellipse_points(a, b, centre, step), false)
    }

    /// Fit an axis-aligned `width` x `height` rectangle around `centre`.
    pub fn set_rectangular_boundary(
        &mut self,
        width: f64,
        height: f64,
        centre: Point2,
    ) -> Result<(), GridError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(GridError::config(format!(
                "rectangle sides must be positive and finite, got {width} x {height}"
            )));
        }
        let step = self.lattice.pitch().min(self.lattice.row_pitch());
        self.set_boundary(&rectangle_points(width, height, centre, step), false)
    }

    /// Mark every element with a missing neighbour as boundary and everything
    /// as inside. Nothing is discarded.
    pub fn set_boundary_on_outer_edge(&mut self) -> Result<(), GridError> {
        if self.config.wrap != WrapMode::None {
            return Err(GridError::config(
                "boundaries cannot be fitted to a wrapped grid",
            ));
        }
        let degree = L::DEGREE;
        let edge: IndexSet<ElementId> = self
            .arena
            .iter()
            .filter(|(_, e)| e.neighbour_count(degree) < degree)
            .map(|(id, _)| id)
            .collect();
        let Some(&start) = edge.first() else {
            return Err(GridError::config("grid has no outer edge"));
        };
        let ring = trace_ring(&self.arena, &edge, start)?;

        self.clear_boundary();
        for e in self.arena.elements_mut() {
            e.flags.insert(ElementFlags::INSIDE_BOUNDARY);
        }
        for &id in &edge {
            self.arena.get_mut(id).flags.insert(ElementFlags::IS_BOUNDARY);
        }
        let positions: Vec<Point2> = ring.iter().map(|&id| self.arena[id].position()).collect();
        self.boundary = ring.iter().map(|&id| self.arena[id].coord()).collect();
        self.centroid = Point2::centroid(&positions);
        self.original_centroid = self.centroid;
        self.enclosed_tiles = self.arena.len() as f64;
        interior::compute_distance_to_boundary(&mut self.arena, self.config.parallel_threshold);
        self.refresh_dense();
        debug!(boundary = self.boundary.len(), "outer edge marked as boundary");
        Ok(())
    }

    /// Element nearest `p`, by descent from the centre element.
    pub fn element_near_point(&self, p: Point2) -> Option<ElementId> {
        self.centre_element()
            .map(|seed| element_near_point(&self.arena, p, seed))
    }

    /// Drop boundary, inside and domain flags and forget the previous ring.
    pub(crate) fn clear_boundary(&mut self) {
        let clear =
            ElementFlags::IS_BOUNDARY | ElementFlags::INSIDE_BOUNDARY | ElementFlags::INSIDE_DOMAIN;
        for e in self.arena.elements_mut() {
            e.flags.remove(clear);
            e.dist_to_boundary = DISTANCE_UNSET;
        }
        self.boundary.clear();
        self.extents = None;
    }
}
