//! Pointy-top hexagonal lattice with axial `(r, g)` coordinates.
//!
//! Element centres sit at `x = d*r + (d/2)*g`, `y = v*g` with row spacing
//! `v = d*sqrt(3)/2`. The third cube coordinate is `b = -r - g`.
//!
//! The full tiling is a hexagon built as concentric rings around one centre
//! element. Ring `k` holds `6k` elements, laid down as six straight sides of
//! length `k` walked anticlockwise from the east corner. The slot of any
//! element is a closed-form function of its coordinates, so each new element
//! wires its links to already-built elements without searching.

use smallvec::{smallvec, SmallVec};
use tessel_core::{ElementId, GridError, LatticeCoord, Point2};
use tracing::debug;

use crate::arena::ElementArena;
use crate::config::GridConfig;
use crate::lattice::{Lattice, LatticeKind};
use crate::overlap::{hex_overlap, Overlap};

/// East.
pub const E: usize = 0;
/// North-east.
pub const NE: usize = 1;
/// North-west.
pub const NW: usize = 2;
/// West.
pub const W: usize = 3;
/// South-west.
pub const SW: usize = 4;
/// South-east.
pub const SE: usize = 5;

/// Axial `(dr, dg)` offsets: E, NE, NW, W, SW, SE.
const HEX_OFFSETS: [(i32, i32); 6] = [
    (1, 0),  // E
    (0, 1),  // NE
    (-1, 1), // NW
    (-1, 0), // W
    (0, -1), // SW
    (1, -1), // SE
];

/// Home tile, first ring in direction order, second ring in build order.
const HEX_OVERLAP_OFFSETS: [(i32, i32); 19] = [
    (0, 0),
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (0, -1),
    (1, -1),
    (2, 0),
    (1, 1),
    (0, 2),
    (-1, 2),
    (-2, 2),
    (-2, 1),
    (-2, 0),
    (-1, -1),
    (0, -2),
    (1, -2),
    (2, -2),
    (2, -1),
];

/// Geometry of a hexagonal lattice of pitch `d`.
///
/// # Examples
///
/// ```
/// use tessel_core::LatticeCoord;
/// use tessel_grid::{HexLattice, Lattice};
///
/// let hex = HexLattice::new(2.0);
/// let p = hex.position(LatticeCoord::new(1, 1));
/// assert!((p.x - 3.0).abs() < 1e-12);
/// assert!((p.y - 3f64.sqrt()).abs() < 1e-12);
/// assert_eq!(hex.round(p), LatticeCoord::new(1, 1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HexLattice {
    d: f64,
    v: f64,
}

impl HexLattice {
    /// Lattice of pitch `d`. The pitch is not validated here; use
    /// [`GridConfig::validate`] for untrusted input.
    pub fn new(d: f64) -> Self {
        Self {
            d,
            v: d * 3f64.sqrt() / 2.0,
        }
    }

    /// Distance from the centre to the middle of an edge, `d/2`.
    pub fn short_radius(&self) -> f64 {
        self.d / 2.0
    }

    /// Distance from the centre to a vertex, `d/sqrt(3)`.
    pub fn long_radius(&self) -> f64 {
        self.d / 3f64.sqrt()
    }

    /// Height of the NE vertex above the centre, `d/(2*sqrt(3))`.
    pub fn vertex_rise(&self) -> f64 {
        self.d / (2.0 * 3f64.sqrt())
    }

    /// Number of rings needed to cover a hexagon of width `span`.
    pub fn rings_for_span(&self, span: f64) -> u32 {
        ((span / 2.0) / self.d).ceil().max(0.0) as u32
    }

    /// Element count of a tiling with `rings` rings around the centre.
    pub fn element_count(rings: u32) -> u64 {
        let r = rings as u64;
        1 + 3 * r * (r + 1)
    }

    /// Ring index of `c`: its hex distance from the origin.
    pub fn ring_of(c: LatticeCoord) -> i32 {
        c.a.abs().max(c.b.abs()).max((c.a + c.b).abs())
    }

    /// Build-order slot of `c` in a ring tiling.
    pub(crate) fn spiral_index(c: LatticeCoord) -> Option<usize> {
        let k = Self::ring_of(c);
        if k == 0 {
            return Some(0);
        }
        let base = 1 + 3 * k as i64 * (k as i64 - 1);
        for (side, &(ca, cb)) in HEX_OFFSETS.iter().enumerate() {
            let (wa, wb) = HEX_OFFSETS[(side + 2) % 6];
            let da = c.a - ca * k;
            let db = c.b - cb * k;
            let j = if wa != 0 { da * wa } else { db * wb };
            if (0..k).contains(&j) && da == j * wa && db == j * wb {
                return Some((base + side as i64 * k as i64 + j as i64) as usize);
            }
        }
        None
    }
}

impl Lattice for HexLattice {
    const KIND: LatticeKind = LatticeKind::Hex;
    const DEGREE: usize = 6;
    const OFFSETS: &'static [(i32, i32)] = &HEX_OFFSETS;
    const MARCH_DIRECTIONS: &'static [usize] = &[E, NE, NW, W, SW, SE];
    const UP: usize = NE;
    const HOPS: [usize; 4] = [E, W, NE, SW];
    const OVERLAP_OFFSETS: &'static [(i32, i32)] = &HEX_OVERLAP_OFFSETS;

    fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        config.validate(LatticeKind::Hex)?;
        Ok(Self::new(config.pitch))
    }

    fn pitch(&self) -> f64 {
        self.d
    }

    fn row_pitch(&self) -> f64 {
        self.v
    }

    fn position(&self, c: LatticeCoord) -> Point2 {
        Point2::new(
            self.d * c.a as f64 + 0.5 * self.d * c.b as f64,
            self.v * c.b as f64,
        )
    }

    fn round(&self, p: Point2) -> LatticeCoord {
        // Fractional axial coordinates, then cube rounding.
        let g = p.y / self.v;
        let r = p.x / self.d - 0.5 * g;
        let b = -r - g;
        let (mut rr, mut rg, rb) = (r.round(), g.round(), b.round());
        let (dr, dg, db) = ((rr - r).abs(), (rg - g).abs(), (rb - b).abs());
        if dr > dg && dr > db {
            rr = -rg - rb;
        } else if dg > db {
            rg = -rr - rb;
        }
        LatticeCoord::new(rr as i32, rg as i32)
    }

    fn tile_vertices(&self, c: Point2) -> SmallVec<[Point2; 6]> {
        let half = self.short_radius();
        let lr = self.long_radius();
        let rise = self.vertex_rise();
        smallvec![
            Point2::new(c.x + half, c.y + rise), // NE
            Point2::new(c.x, c.y + lr),          // N
            Point2::new(c.x - half, c.y + rise), // NW
            Point2::new(c.x - half, c.y - rise), // SW
            Point2::new(c.x, c.y - lr),          // S
            Point2::new(c.x + half, c.y - rise), // SE
        ]
    }

    fn tile_area(&self) -> f64 {
        self.d * self.d * 3f64.sqrt() / 2.0
    }

    fn build(&self, config: &GridConfig) -> Result<ElementArena, GridError> {
        let rings = self.rings_for_span(config.span_x);
        let count = Self::element_count(rings);
        if count >= u32::MAX as u64 {
            return Err(GridError::config(format!(
                "{rings} rings ({count} elements) exceed u32 range"
            )));
        }
        debug!(pitch = self.d, rings, count, "building hex tiling");

        let mut arena = ElementArena::with_capacity(Self::DEGREE, count as usize);
        arena.push(LatticeCoord::ORIGIN, Point2::ZERO)?;

        for k in 1..=rings as i32 {
            for side in 0..6 {
                let (ca, cb) = HEX_OFFSETS[side];
                let (wa, wb) = HEX_OFFSETS[(side + 2) % 6];
                for j in 0..k {
                    let c = LatticeCoord::new(ca * k + wa * j, cb * k + wb * j);
                    let id = arena.push(c, self.position(c))?;
                    for (dir, &(da, db)) in HEX_OFFSETS.iter().enumerate() {
                        let nc = c.offset(da, db);
                        if Self::ring_of(nc) > k {
                            continue;
                        }
                        if let Some(slot) = Self::spiral_index(nc) {
                            if slot < id.index() {
                                arena.link(id, dir, ElementId(slot as u32));
                            }
                        }
                    }
                }
            }
        }
        Ok(arena)
    }

    fn overlap(&self, remainder: Point2) -> Overlap {
        hex_overlap(self, remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn build(d: f64, span: f64) -> ElementArena {
        let cfg = GridConfig::hex(d, span);
        HexLattice::from_config(&cfg).unwrap().build(&cfg).unwrap()
    }

    // ── Construction tests ──────────────────────────────────────

    #[test]
    fn zero_span_is_single_element() {
        let arena = build(1.0, 0.0);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena[ElementId(0)].neighbour_count(6), 0);
    }

    #[test]
    fn ring_counts() {
        for (span, rings) in [(2.0, 1u32), (4.0, 2), (10.0, 5), (9.0, 5)] {
            let arena = build(1.0, span);
            assert_eq!(arena.len() as u64, HexLattice::element_count(rings));
        }
    }

    #[test]
    fn inner_rings_fully_connected() {
        let arena = build(1.0, 8.0);
        let outer = 4;
        for (_, e) in arena.iter() {
            let k = HexLattice::ring_of(e.coord());
            if k < outer {
                assert_eq!(e.neighbour_count(6), 6, "element {} missing links", e.coord());
            } else {
                assert!(e.neighbour_count(6) < 6);
            }
        }
    }

    #[test]
    fn build_order_matches_spiral_index() {
        let arena = build(1.0, 6.0);
        for (id, e) in arena.iter() {
            assert_eq!(HexLattice::spiral_index(e.coord()), Some(id.index()));
        }
    }

    #[test]
    fn neighbours_are_one_pitch_apart() {
        let d = 0.25;
        let arena = build(d, 2.0);
        for (_, e) in arena.iter() {
            for dir in 0..6 {
                if let Some(nb) = e.neighbour(dir) {
                    let dist = e.distance_from(&arena[nb]);
                    assert!((dist - d).abs() < 1e-12);
                    let (da, db) = HEX_OFFSETS[dir];
                    assert_eq!(arena[nb].coord(), e.coord().offset(da, db));
                }
            }
        }
    }

    #[test]
    fn tiling_is_symmetric() {
        let arena = build(1.0, 7.0);
        compliance::assert_arena_symmetric(&arena);
    }

    // ── Geometry tests ──────────────────────────────────────────

    #[test]
    fn vertices_anticlockwise_with_expected_area() {
        let hex = HexLattice::new(1.0);
        let verts = hex.tile_vertices(Point2::ZERO);
        let area = crate::overlap::polygon_area(&verts);
        assert!((area - hex.tile_area()).abs() < 1e-12);
        assert!((verts[1].y - hex.long_radius()).abs() < 1e-12);
    }

    #[test]
    fn round_prefers_nearest_centre() {
        let hex = HexLattice::new(1.0);
        assert_eq!(hex.round(Point2::new(0.49, 0.0)), LatticeCoord::ORIGIN);
        assert_eq!(hex.round(Point2::new(0.51, 0.0)), LatticeCoord::new(1, 0));
        assert_eq!(hex.round(Point2::new(0.0, 0.56)), LatticeCoord::ORIGIN);
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn round_inverts_position(a in -50i32..50, b in -50i32..50) {
            let hex = HexLattice::new(0.3);
            let c = LatticeCoord::new(a, b);
            prop_assert_eq!(hex.round(hex.position(c)), c);
        }

        #[test]
        fn round_lands_on_nearest_centre(x in -5.0f64..5.0, y in -5.0f64..5.0) {
            let hex = HexLattice::new(1.0);
            let p = Point2::new(x, y);
            let best = hex.position(hex.round(p)).distance(p);
            for (da, db) in HEX_OFFSETS {
                let other = hex.position(hex.round(p).offset(da, db)).distance(p);
                prop_assert!(best <= other + 1e-9);
            }
        }
    }
}
