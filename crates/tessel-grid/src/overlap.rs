//! Overlap fractions of a tile translated by an arbitrary real 2-D vector.
//!
//! A translation is split into a whole lattice step and a sub-pitch
//! remainder ([`LatticeShift`]). The tile moved by the remainder is clipped
//! against the home tile and its surrounding tiles; the clipped areas,
//! divided by the tile area, are the fractions of the tile's content that
//! land in each of them. They sum to one whenever the surrounding tiles
//! cover the moved tile. When they do not, the result carries the
//! [`OverlapStatus::ShiftTooLarge`] sentinel and all-zero fractions, telling
//! the caller to retry with a coarser lattice step.

use smallvec::{smallvec, SmallVec};
use tessel_core::{ElementId, GridError, LatticeCoord, Point2};

use crate::grid::Grid;
use crate::hex::HexLattice;
use crate::lattice::Lattice;
use crate::parallel;
use crate::rect::RectLattice;

/// Coverage below `1 - COVERAGE_TOLERANCE` is reported as too large a shift.
pub const COVERAGE_TOLERANCE: f64 = 1e-5;

/// Distance, in pitches, within which a crossing counts as landing on a
/// vertex or two outlines count as touching.
const VERTEX_TOLERANCE: f64 = 1e-9;

/// Relative tolerance on the chord of a neighbour-direction shift being
/// perpendicular to the remainder.
const ANGLE_EPSILON: f64 = 1e-9;

// ── Primitive geometry ─────────────────────────────────────────────

/// Intersection of segments `p1-p2` and `q1-q2`.
///
/// Returns [`Point2::NAN`] when the segments are parallel or colinear, or
/// when their supporting lines cross outside either segment.
pub fn segment_intersection(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> Point2 {
    segment_crossing(p1, p2, q1, q2, 0.0).unwrap_or(Point2::NAN)
}

/// Intersection of segments `p1-p2` and `q1-q2`, accepting crossings that
/// fall up to `tol` metres past the end of either segment. `None` for
/// parallel segments.
fn segment_crossing(p1: Point2, p2: Point2, q1: Point2, q2: Point2, tol: f64) -> Option<Point2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.cross(s);
    if denom.abs() <= 1e-14 * r.length() * s.length() {
        return None;
    }
    let qp = q1 - p1;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    let (slack_t, slack_u) = (tol / r.length(), tol / s.length());
    let within_p = (-slack_t..=1.0 + slack_t).contains(&t);
    let within_q = (-slack_u..=1.0 + slack_u).contains(&u);
    (within_p && within_q).then(|| p1 + r * t)
}

/// Point where segment `p1-p2` crosses the infinite line through `a`, `b`.
fn line_crossing(p1: Point2, p2: Point2, a: Point2, b: Point2) -> Point2 {
    let r = p2 - p1;
    let s = b - a;
    let denom = r.cross(s);
    if denom == 0.0 {
        return p1;
    }
    p1 + r * ((a - p1).cross(s) / denom)
}

/// Area of a simple polygon (shoelace formula), positive for either winding.
pub fn polygon_area(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum();
    twice.abs() / 2.0
}

/// Clip `subject` against convex, anticlockwise `clip` (Sutherland-Hodgman).
///
/// `subject` may be any simple polygon. A concave one can leave zero-width
/// slivers along the edges of `clip`; they add nothing to the area.
pub fn clip_convex(subject: &[Point2], clip: &[Point2]) -> SmallVec<[Point2; 12]> {
    let mut output: SmallVec<[Point2; 12]> = subject.iter().copied().collect();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let edge = b - a;
        let inside = |p: Point2| edge.cross(p - a) >= 0.0;
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let cur = input[j];
            let prev = input[(j + input.len() - 1) % input.len()];
            match (inside(prev), inside(cur)) {
                (true, true) => output.push(cur),
                (true, false) => output.push(line_crossing(prev, cur, a, b)),
                (false, true) => {
                    output.push(line_crossing(prev, cur, a, b));
                    output.push(cur);
                }
                (false, false) => {}
            }
        }
    }
    output
}

// ── Results ────────────────────────────────────────────────────────

/// Geometric configuration of a translated tile relative to its home tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapCase {
    /// Zero remainder: the tile stays where it is.
    Identity,
    /// Remainder along a neighbour direction: the two outline crossings sit
    /// on edge interiors and their chord is perpendicular to the remainder.
    DirectEdge,
    /// Generic remainder: the two crossings sit on edge interiors but their
    /// chord is skewed, so the leading corner cuts into the neighbours
    /// either side of the direct one.
    CornerOnly,
    /// A crossing lands on a vertex of either outline: translated edges
    /// slide along the lines of the home tile's edges. On rectangular
    /// lattices every such shift points at a neighbour and is reported as
    /// [`DirectEdge`](Self::DirectEdge).
    Colinear,
    /// The translated outline meets a tile past the first ring of
    /// neighbours, if only at a point.
    Far,
}

/// Whether the overlap tiles covered the translated tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapStatus {
    /// Fractions sum to one.
    Covered,
    /// The translated tile leaves the covered neighbourhood; fractions are
    /// all zero.
    ShiftTooLarge,
}

/// Overlap fractions of one translated tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlap {
    fractions: SmallVec<[f64; 19]>,
    case: Option<OverlapCase>,
    rotation: usize,
    crossings: SmallVec<[Point2; 8]>,
    status: OverlapStatus,
}

impl Overlap {
    fn too_large(len: usize) -> Self {
        Self {
            fractions: smallvec![0.0; len],
            case: None,
            rotation: 0,
            crossings: SmallVec::new(),
            status: OverlapStatus::ShiftTooLarge,
        }
    }

    /// One fraction per entry of [`Lattice::OVERLAP_OFFSETS`].
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Sum of all fractions: 1 when covered, 0 for the sentinel.
    pub fn total(&self) -> f64 {
        self.fractions.iter().sum()
    }

    /// The classified configuration, `None` for the sentinel.
    pub fn case(&self) -> Option<OverlapCase> {
        self.case
    }

    /// Index of the neighbour direction closest to the remainder direction.
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// Points where the translated outline meets the home outline; they
    /// decide the [`case`](Self::case).
    pub fn crossings(&self) -> &[Point2] {
        &self.crossings
    }

    /// Coverage status.
    pub fn status(&self) -> OverlapStatus {
        self.status
    }

    /// `true` unless this is the shift-too-large sentinel.
    pub fn is_covered(&self) -> bool {
        self.status == OverlapStatus::Covered
    }
}

// ── Shift splitting ────────────────────────────────────────────────

/// A translation split into a whole lattice step and a sub-pitch remainder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeShift {
    /// Whole lattice step, rounded in lattice-coordinate space.
    pub step: LatticeCoord,
    /// What is left over, in metres. Lies within the home tile.
    pub remainder: Point2,
}

impl LatticeShift {
    /// Split `shift` on `lattice`.
    pub fn split<L: Lattice>(lattice: &L, shift: Point2) -> Self {
        let origin = lattice.position(LatticeCoord::ORIGIN);
        let step = lattice.round(origin + shift);
        let whole = lattice.position(step) - origin;
        Self {
            step,
            remainder: shift - whole,
        }
    }
}

// ── Lattice-specific overlap ───────────────────────────────────────

/// Nearest direction index to `remainder` for a lattice of `degree`
/// directions spaced evenly from east.
fn rotation_index(remainder: Point2, degree: usize) -> usize {
    let sector = std::f64::consts::TAU / degree as f64;
    let angle = remainder.y.atan2(remainder.x).rem_euclid(std::f64::consts::TAU);
    ((angle / sector).round() as usize) % degree
}

/// Points where the `moved` outline meets the `home` outline. Crossings
/// closer than `tol` are merged.
fn outline_crossings(moved: &[Point2], home: &[Point2], tol: f64) -> SmallVec<[Point2; 8]> {
    let mut out: SmallVec<[Point2; 8]> = SmallVec::new();
    let (n, m) = (moved.len(), home.len());
    for i in 0..n {
        for j in 0..m {
            let (a, b) = (moved[i], moved[(i + 1) % n]);
            if let Some(p) = segment_crossing(a, b, home[j], home[(j + 1) % m], tol) {
                if !out.iter().any(|q| q.distance(p) <= tol.max(1e-12)) {
                    out.push(p);
                }
            }
        }
    }
    out
}

/// `true` if any crossing lies on a vertex of either outline.
fn meets_vertex(crossings: &[Point2], moved: &[Point2], home: &[Point2], tol: f64) -> bool {
    crossings
        .iter()
        .any(|c| moved.iter().chain(home).any(|v| v.distance(*c) <= tol))
}

/// `true` for exactly two crossings whose chord is perpendicular to
/// `remainder`.
fn chord_is_perpendicular(crossings: &[Point2], remainder: Point2) -> bool {
    match crossings {
        [a, b] => {
            let chord = *a - *b;
            chord.dot(remainder).abs() <= ANGLE_EPSILON * chord.length() * remainder.length()
        }
        _ => false,
    }
}

/// `true` if the `moved` outline meets any hex tile past the first ring.
fn reaches_second_ring(lattice: &HexLattice, moved: &[Point2], tol: f64) -> bool {
    let origin = lattice.position(LatticeCoord::ORIGIN);
    HexLattice::OVERLAP_OFFSETS[1 + HexLattice::DEGREE..]
        .iter()
        .any(|&(da, db)| {
            let centre = lattice.position(LatticeCoord::new(da, db)) - origin;
            !outline_crossings(moved, &lattice.tile_vertices(centre), tol).is_empty()
        })
}

/// Clipped-area fractions of the tile moved by `remainder` against every
/// overlap tile of `lattice`.
pub fn clipped_fractions<L: Lattice>(lattice: &L, remainder: Point2) -> SmallVec<[f64; 19]> {
    let origin = lattice.position(LatticeCoord::ORIGIN);
    let moved = lattice.tile_vertices(origin + remainder);
    let area = lattice.tile_area();
    let reach = 2.0 * lattice.pitch().max(lattice.row_pitch());
    L::OVERLAP_OFFSETS
        .iter()
        .map(|&(da, db)| {
            let centre = lattice.position(LatticeCoord::new(da, db));
            if centre.distance(origin + remainder) > reach {
                return 0.0;
            }
            let target = lattice.tile_vertices(centre);
            polygon_area(&clip_convex(&moved, &target)) / area
        })
        .collect()
}

/// Overlap of a hex tile moved by `remainder`, by exact clipping against
/// the home tile, its six neighbours and the twelve second-ring tiles.
pub fn hex_overlap(lattice: &HexLattice, remainder: Point2) -> Overlap {
    let n = HexLattice::OVERLAP_OFFSETS.len();
    if !(remainder.x.is_finite() && remainder.y.is_finite()) {
        return Overlap::too_large(n);
    }
    let fractions = clipped_fractions(lattice, remainder);
    let total: f64 = fractions.iter().sum();
    if total < 1.0 - COVERAGE_TOLERANCE {
        return Overlap::too_large(n);
    }

    let tol = VERTEX_TOLERANCE * lattice.pitch();
    let home = lattice.tile_vertices(Point2::ZERO);
    let moved = lattice.tile_vertices(remainder);
    let crossings = outline_crossings(&moved, &home, tol);

    let case = if remainder.length() <= tol {
        OverlapCase::Identity
    } else if reaches_second_ring(lattice, &moved, tol) {
        OverlapCase::Far
    } else if meets_vertex(&crossings, &moved, &home, tol) {
        OverlapCase::Colinear
    } else if chord_is_perpendicular(&crossings, remainder) {
        OverlapCase::DirectEdge
    } else {
        OverlapCase::CornerOnly
    };
    let rotation = if case == OverlapCase::Identity {
        0
    } else {
        rotation_index(remainder, HexLattice::DEGREE)
    };

    Overlap {
        fractions,
        case: Some(case),
        rotation,
        crossings,
        status: OverlapStatus::Covered,
    }
}

/// Overlap of a rectangular tile moved by `remainder`, in closed form: the
/// moved tile splits into at most four axis-aligned pieces.
pub fn rect_overlap(lattice: &RectLattice, remainder: Point2) -> Overlap {
    let n = RectLattice::OVERLAP_OFFSETS.len();
    let fx = remainder.x / lattice.pitch();
    let fy = remainder.y / lattice.row_pitch();
    if !(fx.is_finite() && fy.is_finite()) || fx.abs() > 1.0 || fy.abs() > 1.0 {
        return Overlap::too_large(n);
    }
    let weight = |f: f64, step: i32| match step {
        0 => 1.0 - f.abs(),
        1 => f.max(0.0),
        _ => (-f).max(0.0),
    };
    let fractions: SmallVec<[f64; 19]> = RectLattice::OVERLAP_OFFSETS
        .iter()
        .map(|&(da, db)| weight(fx, da) * weight(fy, db))
        .collect();

    let tol = VERTEX_TOLERANCE * lattice.pitch().min(lattice.row_pitch());
    let home = lattice.tile_vertices(Point2::ZERO);
    let moved = lattice.tile_vertices(remainder);
    let crossings = outline_crossings(&moved, &home, tol);

    let case = if remainder.length() <= tol {
        OverlapCase::Identity
    } else if meets_vertex(&crossings, &moved, &home, tol) {
        OverlapCase::DirectEdge
    } else {
        OverlapCase::CornerOnly
    };
    let rotation = if case == OverlapCase::Identity {
        0
    } else {
        rotation_index(remainder, RectLattice::DEGREE)
    };
    Overlap {
        fractions,
        case: Some(case),
        rotation,
        crossings,
        status: OverlapStatus::Covered,
    }
}

// ── Field shifting ─────────────────────────────────────────────────

/// A dense field translated by a real-valued vector.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftedField {
    /// One value per element of the grid.
    pub values: Vec<f64>,
    /// How the translation was split.
    pub shift: LatticeShift,
    /// Overlap fractions used for redistribution.
    pub overlap: Overlap,
    /// Total content that left the domain.
    pub mass_lost: f64,
}

impl<L: Lattice> Grid<L> {
    /// Overlap fractions for a tile of this grid translated by `shift`.
    pub fn overlap_for_shift(&self, shift: Point2) -> (LatticeShift, Overlap) {
        let split = LatticeShift::split(self.lattice(), shift);
        let overlap = self.lattice().overlap(split.remainder);
        (split, overlap)
    }

    /// Translate a per-element field by `shift`, redistributing each
    /// element's content over the tiles its translated outline covers.
    ///
    /// For a covered shift, content is conserved: the sum of the output
    /// plus [`ShiftedField::mass_lost`] equals the sum of the input. A shift
    /// whose overlap is the too-large sentinel yields all zeros. Target
    /// tiles are located by hopping along neighbour links, so wrapped
    /// seams are honoured and content leaving an irregular edge is lost.
    pub fn shift_field(&self, data: &[f64], shift: Point2) -> Result<ShiftedField, GridError> {
        self.dense().check_len("data", data.len())?;
        let (split, overlap) = self.overlap_for_shift(shift);
        let n = self.len();
        if !overlap.is_covered() {
            return Ok(ShiftedField {
                values: vec![0.0; n],
                shift: split,
                overlap,
                mass_lost: 0.0,
            });
        }

        let weights: Vec<(i32, i32, f64)> = L::OVERLAP_OFFSETS
            .iter()
            .zip(overlap.fractions())
            .filter(|(_, f)| **f > 0.0)
            .map(|(&(da, db), &f)| (split.step.a + da, split.step.b + db, f))
            .collect();

        let targets: Vec<SmallVec<[Option<ElementId>; 19]>> =
            parallel::map_indexed(n, self.config().parallel_threshold, |i| {
                weights
                    .iter()
                    .map(|&(da, db, _)| self.hop(ElementId(i as u32), da, db))
                    .collect()
            });

        let mut values = vec![0.0; n];
        let mut mass_lost = 0.0;
        for (src, row) in targets.iter().enumerate() {
            for (target, &(_, _, f)) in row.iter().zip(&weights) {
                match target {
                    Some(t) => values[t.index()] += f * data[src],
                    None => mass_lost += f * data[src],
                }
            }
        }
        Ok(ShiftedField {
            values,
            shift: split,
            overlap,
            mass_lost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn hex() -> HexLattice {
        HexLattice::new(1.0)
    }

    // ── Primitive tests ─────────────────────────────────────────

    #[test]
    fn crossing_segments_intersect() {
        let p = segment_intersection(
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, -1.0),
            Point2::new(0.0, 1.0),
        );
        assert!(p.distance(Point2::ZERO) < 1e-15);
    }

    #[test]
    fn parallel_and_colinear_segments_are_nan() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(segment_intersection(a, b, Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)).is_nan());
        assert!(segment_intersection(a, b, Point2::new(0.5, 0.0), Point2::new(2.0, 0.0)).is_nan());
    }

    #[test]
    fn disjoint_segments_are_nan() {
        let p = segment_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, -1.0),
            Point2::new(2.0, 1.0),
        );
        assert!(p.is_nan());
    }

    #[test]
    fn clip_square_against_shifted_square() {
        let sq = |cx: f64, cy: f64| {
            vec![
                Point2::new(cx + 0.5, cy + 0.5),
                Point2::new(cx - 0.5, cy + 0.5),
                Point2::new(cx - 0.5, cy - 0.5),
                Point2::new(cx + 0.5, cy - 0.5),
            ]
        };
        let clipped = clip_convex(&sq(0.25, 0.5), &sq(0.0, 0.0));
        assert!((polygon_area(&clipped) - 0.75 * 0.5).abs() < 1e-12);
    }

    // ── Hex overlap tests ───────────────────────────────────────

    #[test]
    fn zero_remainder_is_identity() {
        let o = hex().overlap(Point2::ZERO);
        assert_eq!(o.case(), Some(OverlapCase::Identity));
        assert!((o.fractions()[0] - 1.0).abs() < 1e-12);
        assert!(o.fractions()[1..].iter().all(|&f| f.abs() < 1e-12));
    }

    #[test]
    fn direct_edge_shift_splits_symmetrically() {
        // Shift east: the east neighbour gets a strip, NE and SE get
        // congruent triangles.
        let o = hex().overlap(Point2::new(0.2, 0.0));
        assert_eq!(o.case(), Some(OverlapCase::DirectEdge));
        assert_eq!(o.rotation(), crate::hex::E);
        let f = o.fractions();
        assert!((f[1 + crate::hex::NE] - f[1 + crate::hex::SE]).abs() < 1e-12);
        assert!(f[1 + crate::hex::E] > f[1 + crate::hex::NE]);
        assert!(f[1 + crate::hex::W].abs() < 1e-12);
        assert!((o.total() - 1.0).abs() < 1e-12);
        assert_eq!(o.crossings().len(), 2);
    }

    #[test]
    fn edge_parallel_shift_is_colinear() {
        let d = Point2::new(30f64.to_radians().cos(), 30f64.to_radians().sin()) * 0.1;
        let o = hex().overlap(d);
        assert_eq!(o.case(), Some(OverlapCase::Colinear));
        let f = o.fractions();
        // Only the two neighbours either side of the edge direction receive content.
        let touched = f[1..7].iter().filter(|&&x| x > 1e-12).count();
        assert_eq!(touched, 2);
    }

    #[test]
    fn generic_shift_is_corner_only() {
        let o = hex().overlap(Point2::new(0.2, 0.05));
        assert_eq!(o.case(), Some(OverlapCase::CornerOnly));
        assert_eq!(o.rotation(), crate::hex::E);
    }

    #[test]
    fn unrounded_large_remainder_is_far() {
        // Towards a vertex, past the first ring.
        let t = 30f64.to_radians();
        let o = hex().overlap(Point2::new(t.cos(), t.sin()) * 0.9);
        assert_eq!(o.case(), Some(OverlapCase::Far));
        assert!((o.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn remainder_beyond_second_ring_is_sentinel() {
        let o = hex().overlap(Point2::new(2.6, 0.0));
        assert_eq!(o.status(), OverlapStatus::ShiftTooLarge);
        assert_eq!(o.case(), None);
        assert_eq!(o.total(), 0.0);
        assert_eq!(o.fractions().len(), 19);
    }

    #[test]
    fn split_keeps_remainder_inside_home_tile() {
        let h = hex();
        let s = LatticeShift::split(&h, Point2::new(0.8, 0.1));
        assert_eq!(s.step, LatticeCoord::new(1, 0));
        assert!(s.remainder.length() <= h.long_radius() + 1e-12);
    }

    #[test]
    fn hex_fractions_sum_to_one_for_random_shifts() {
        let h = HexLattice::new(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let mag = rng.random_range(0.0..0.5);
            let theta = rng.random_range(0.0..std::f64::consts::TAU);
            let shift = Point2::new(mag * theta.cos(), mag * theta.sin());
            let split = LatticeShift::split(&h, shift);
            let overlap = h.overlap(split.remainder);
            assert!(overlap.is_covered());
            assert!(
                (overlap.total() - 1.0).abs() < COVERAGE_TOLERANCE,
                "shift {shift:?} sums to {}",
                overlap.total()
            );
        }
    }

    // ── Rect overlap tests ──────────────────────────────────────

    #[test]
    fn rect_closed_form_matches_clipping() {
        let cfg = GridConfig::rect(1.0, 2.0, 4.0, 4.0);
        let r = RectLattice::from_config(&cfg).unwrap();
        let rem = Point2::new(0.3, -0.7);
        let closed = r.overlap(rem);
        let clipped = clipped_fractions(&r, rem);
        for (a, b) in closed.fractions().iter().zip(clipped.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(closed.case(), Some(OverlapCase::CornerOnly));
    }

    #[test]
    fn rect_axis_shift_is_direct_edge() {
        let r = RectLattice::from_config(&GridConfig::square(1.0, 4.0)).unwrap();
        let o = r.overlap(Point2::new(0.0, 0.25));
        assert_eq!(o.case(), Some(OverlapCase::DirectEdge));
        assert_eq!(o.rotation(), crate::rect::N);
        assert!((o.fractions()[1 + crate::rect::N] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn rect_large_remainder_is_sentinel() {
        let r = RectLattice::from_config(&GridConfig::square(1.0, 4.0)).unwrap();
        assert!(!r.overlap(Point2::new(1.5, 0.0)).is_covered());
    }

    // ── Case boundary tests ─────────────────────────────────────

    fn polar(degrees: f64, length: f64) -> Point2 {
        let t = degrees.to_radians();
        Point2::new(t.cos(), t.sin()) * length
    }

    #[test]
    fn neighbour_direction_bounds_direct_edge() {
        let h = hex();
        for k in 0..6 {
            let on = 60.0 * k as f64;
            let o = h.overlap(polar(on, 0.3));
            assert_eq!(o.case(), Some(OverlapCase::DirectEdge), "{on} degrees");
            assert_eq!(o.crossings().len(), 2);
            let off = h.overlap(polar(on + 1e-4, 0.3));
            assert_eq!(off.case(), Some(OverlapCase::CornerOnly), "{on} degrees + 1e-4");
        }
    }

    #[test]
    fn edge_direction_bounds_colinear() {
        let h = hex();
        for k in 0..6 {
            let on = 30.0 + 60.0 * k as f64;
            let o = h.overlap(polar(on, 0.3));
            assert_eq!(o.case(), Some(OverlapCase::Colinear), "{on} degrees");
            let off = h.overlap(polar(on - 1e-4, 0.3));
            assert_eq!(off.case(), Some(OverlapCase::CornerOnly), "{on} degrees - 1e-4");
        }
    }

    #[test]
    fn touching_the_second_ring_is_far() {
        // Moved by its own NE vertex, the tile's NE vertex lands on the SW
        // vertex of tile (1, 1): contact without area.
        let h = hex();
        let corner = h.tile_vertices(Point2::ZERO)[0];
        let o = h.overlap(corner);
        assert_eq!(o.case(), Some(OverlapCase::Far));
        assert!(o.is_covered());
        assert!(o.fractions()[1 + HexLattice::DEGREE..].iter().all(|&f| f < 1e-9));

        let short = h.overlap(corner * 0.99);
        assert_eq!(short.case(), Some(OverlapCase::Colinear));
    }

    #[test]
    fn rect_axis_bounds_direct_edge() {
        let r = RectLattice::from_config(&GridConfig::square(1.0, 4.0)).unwrap();
        assert_eq!(r.overlap(Point2::ZERO).case(), Some(OverlapCase::Identity));
        assert_eq!(
            r.overlap(Point2::new(0.25, 0.0)).case(),
            Some(OverlapCase::DirectEdge)
        );
        assert_eq!(
            r.overlap(Point2::new(0.25, 1e-6)).case(),
            Some(OverlapCase::CornerOnly)
        );
    }

    // ── Field shifting tests ────────────────────────────────────

    #[test]
    fn shift_field_conserves_mass() {
        let grid = Grid::<HexLattice>::new(GridConfig::hex(1.0, 10.0)).unwrap();
        let data: Vec<f64> = (0..grid.len()).map(|i| (i % 7) as f64).collect();
        let shifted = grid.shift_field(&data, Point2::new(0.37, -0.81)).unwrap();
        let before: f64 = data.iter().sum();
        let after: f64 = shifted.values.iter().sum::<f64>() + shifted.mass_lost;
        assert!((before - after).abs() < 1e-9 * before);
        assert!(shifted.mass_lost > 0.0);
    }

    #[test]
    fn whole_step_shift_moves_values() {
        let grid = Grid::<RectLattice>::new(GridConfig::square(1.0, 4.0)).unwrap();
        let mut data = vec![0.0; grid.len()];
        let centre = grid.arena().find(LatticeCoord::ORIGIN).unwrap();
        data[centre.index()] = 1.0;
        let shifted = grid.shift_field(&data, Point2::new(1.0, 0.0)).unwrap();
        let east = grid.arena().find(LatticeCoord::new(1, 0)).unwrap();
        assert!((shifted.values[east.index()] - 1.0).abs() < 1e-12);
        assert_eq!(shifted.shift.step, LatticeCoord::new(1, 0));
    }

    #[test]
    fn shift_field_rejects_wrong_length() {
        let grid = Grid::<RectLattice>::new(GridConfig::square(1.0, 4.0)).unwrap();
        assert!(matches!(
            grid.shift_field(&[1.0; 3], Point2::ZERO),
            Err(GridError::SizeMismatch { .. })
        ));
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn hex_fractions_are_non_negative(x in -0.5f64..0.5, y in -0.5f64..0.5) {
            let h = hex();
            let s = LatticeShift::split(&h, Point2::new(x, y));
            let o = h.overlap(s.remainder);
            prop_assert!(o.fractions().iter().all(|&f| f >= -1e-12));
            prop_assert!((o.total() - 1.0).abs() < COVERAGE_TOLERANCE);
        }
    }
}
