//! Rectangular lattice with eight-connected `(xi, yi)` coordinates.
//!
//! Element centres sit at `x = dx*xi + ox`, `y = dy*yi + oy`. The offsets
//! `ox`, `oy` are zero when a span holds an odd number of elements (so one
//! element sits on each axis) and half a pitch when it holds an even number;
//! either way the tiling is symmetric about the origin.

use smallvec::{smallvec, SmallVec};
use tessel_core::{ElementId, GridError, LatticeCoord, Point2};
use tracing::debug;

use crate::arena::ElementArena;
use crate::config::{GridConfig, WrapMode};
use crate::grid::Grid;
use crate::lattice::{Lattice, LatticeKind};
use crate::overlap::{rect_overlap, Overlap};

/// East.
pub const E: usize = 0;
/// North-east.
pub const NE: usize = 1;
/// North.
pub const N: usize = 2;
/// North-west.
pub const NW: usize = 3;
/// West.
pub const W: usize = 4;
/// South-west.
pub const SW: usize = 5;
/// South.
pub const S: usize = 6;
/// South-east.
pub const SE: usize = 7;

/// `(dxi, dyi)` offsets: E, NE, N, NW, W, SW, S, SE.
const RECT_OFFSETS: [(i32, i32); 8] = [
    (1, 0),   // E
    (1, 1),   // NE
    (0, 1),   // N
    (-1, 1),  // NW
    (-1, 0),  // W
    (-1, -1), // SW
    (0, -1),  // S
    (1, -1),  // SE
];

const RECT_OVERLAP_OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Number of elements along an axis of length `span` at spacing `pitch`.
fn cells_along(span: f64, pitch: f64, axis: &str) -> Result<u32, GridError> {
    let steps = span / pitch;
    let rounded = steps.round();
    if (steps - rounded).abs() > 1e-6 * rounded.max(1.0) {
        return Err(GridError::config(format!(
            "{axis} span {span} is not a whole multiple of pitch {pitch}; \
             the grid cannot be symmetric about the origin"
        )));
    }
    if rounded + 1.0 >= u32::MAX as f64 {
        return Err(GridError::config(format!(
            "{axis} span {span} at pitch {pitch} exceeds u32 range"
        )));
    }
    Ok(rounded as u32 + 1)
}

/// Geometry and extent of a rectangular lattice.
///
/// # Examples
///
/// ```
/// use tessel_grid::{GridConfig, Lattice, RectLattice};
///
/// let rect = RectLattice::from_config(&GridConfig::square(1.0, 10.0)).unwrap();
/// assert_eq!(rect.cols(), 11);
/// assert_eq!(rect.rows(), 11);
///
/// // An even element count puts centres on half-pitch positions.
/// let even = RectLattice::from_config(&GridConfig::square(1.0, 3.0)).unwrap();
/// assert_eq!(even.cols(), 4);
/// assert_eq!(even.position(tessel_core::LatticeCoord::new(-2, 0)).x, -1.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RectLattice {
    dx: f64,
    dy: f64,
    ox: f64,
    oy: f64,
    cols: u32,
    rows: u32,
    wrap: WrapMode,
}

impl RectLattice {
    /// Columns in the full tiling.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Rows in the full tiling.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge wrapping applied by [`build`](Lattice::build).
    pub fn wrap(&self) -> WrapMode {
        self.wrap
    }

    /// Lattice coordinate of the first column and row.
    fn lower_corner(&self) -> LatticeCoord {
        LatticeCoord::new(-((self.cols / 2) as i32), -((self.rows / 2) as i32))
    }

    /// Link elements across the closed seams of a wrapped tiling.
    fn wrap_seams(&self, arena: &mut ElementArena) {
        let cols = self.cols as i32;
        let rows = self.rows as i32;
        let slot = |col: i32, row: i32| ElementId((row * cols + col) as u32);
        for row in 0..rows {
            for col in 0..cols {
                let on_edge = col == 0 || col == cols - 1 || row == 0 || row == rows - 1;
                if !on_edge {
                    continue;
                }
                let id = slot(col, row);
                for (dir, &(da, db)) in RECT_OFFSETS.iter().enumerate() {
                    if arena[id].neighbour(dir).is_some() {
                        continue;
                    }
                    let mut tc = col + da;
                    let mut tr = row + db;
                    if self.wrap.wraps_x() {
                        tc = tc.rem_euclid(cols);
                    }
                    if self.wrap.wraps_y() {
                        tr = tr.rem_euclid(rows);
                    }
                    if (0..cols).contains(&tc) && (0..rows).contains(&tr) {
                        arena.link(id, dir, slot(tc, tr));
                    }
                }
            }
        }
    }
}

impl Lattice for RectLattice {
    const KIND: LatticeKind = LatticeKind::Rect;
    const DEGREE: usize = 8;
    const OFFSETS: &'static [(i32, i32)] = &RECT_OFFSETS;
    const MARCH_DIRECTIONS: &'static [usize] = &[E, N, W, S];
    const UP: usize = N;
    const HOPS: [usize; 4] = [E, W, N, S];
    const OVERLAP_OFFSETS: &'static [(i32, i32)] = &RECT_OVERLAP_OFFSETS;

    fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        config.validate(LatticeKind::Rect)?;
        let (dx, dy) = (config.pitch, config.row_pitch);
        let cols = cells_along(config.span_x, dx, "x")?;
        let rows = cells_along(config.span_y, dy, "y")?;
        if cols as u64 * rows as u64 >= u32::MAX as u64 {
            return Err(GridError::config(format!(
                "{cols}x{rows} elements exceed u32 range"
            )));
        }
        if config.wrap.wraps_x() && cols < 3 || config.wrap.wraps_y() && rows < 3 {
            return Err(GridError::config(format!(
                "wrapping needs at least 3 elements along each wrapped axis, got {cols}x{rows}"
            )));
        }
        let half_if_even = |n: u32, d: f64| if n % 2 == 0 { d / 2.0 } else { 0.0 };
        Ok(Self {
            dx,
            dy,
            ox: half_if_even(cols, dx),
            oy: half_if_even(rows, dy),
            cols,
            rows,
            wrap: config.wrap,
        })
    }

    fn pitch(&self) -> f64 {
        self.dx
    }

    fn row_pitch(&self) -> f64 {
        self.dy
    }

    fn position(&self, c: LatticeCoord) -> Point2 {
        Point2::new(
            self.dx * c.a as f64 + self.ox,
            self.dy * c.b as f64 + self.oy,
        )
    }

    fn round(&self, p: Point2) -> LatticeCoord {
        LatticeCoord::new(
            ((p.x - self.ox) / self.dx).round() as i32,
            ((p.y - self.oy) / self.dy).round() as i32,
        )
    }

    fn tile_vertices(&self, c: Point2) -> SmallVec<[Point2; 6]> {
        let hx = self.dx / 2.0;
        let hy = self.dy / 2.0;
        smallvec![
            Point2::new(c.x + hx, c.y + hy),
            Point2::new(c.x - hx, c.y + hy),
            Point2::new(c.x - hx, c.y - hy),
            Point2::new(c.x + hx, c.y - hy),
        ]
    }

    fn tile_area(&self) -> f64 {
        self.dx * self.dy
    }

    fn build(&self, _config: &GridConfig) -> Result<ElementArena, GridError> {
        let (cols, rows) = (self.cols as usize, self.rows as usize);
        debug!(
            dx = self.dx,
            dy = self.dy,
            cols,
            rows,
            wrap = ?self.wrap,
            "building rect tiling"
        );
        let lo = self.lower_corner();
        let mut arena = ElementArena::with_capacity(Self::DEGREE, cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let c = lo.offset(col as i32, row as i32);
                let id = arena.push(c, self.position(c))?;
                if col > 0 {
                    arena.link(id, W, ElementId(id.0 - 1));
                }
                if row > 0 {
                    let below = id.0 - cols as u32;
                    arena.link(id, S, ElementId(below));
                    if col > 0 {
                        arena.link(id, SW, ElementId(below - 1));
                    }
                    if col + 1 < cols {
                        arena.link(id, SE, ElementId(below + 1));
                    }
                }
            }
        }
        if self.wrap != WrapMode::None {
            self.wrap_seams(&mut arena);
        }
        Ok(arena)
    }

    fn overlap(&self, remainder: Point2) -> Overlap {
        rect_overlap(self, remainder)
    }
}

// ── Cartesian shift helpers ────────────────────────────────────────

impl Grid<RectLattice> {
    /// Translate `coords` by `(dx, dy)` rounded to whole lattice steps.
    pub fn shift_coords(&self, coords: &[Point2], dx: f64, dy: f64) -> Vec<Point2> {
        let step = self.metric_steps(dx, dy);
        let delta = Point2::new(
            step.a as f64 * self.lattice().pitch(),
            step.b as f64 * self.lattice().row_pitch(),
        );
        coords.iter().map(|&p| p + delta).collect()
    }

    /// Map dense indices through a metric shift of `(mx, my)`, rounded to
    /// whole lattice steps. Destinations that fall outside the grid are
    /// dropped; the survivors keep their input order.
    pub fn shift_indices_by_metric(&self, indices: &[u32], mx: f64, my: f64) -> Vec<u32> {
        let step = self.metric_steps(mx, my);
        indices
            .iter()
            .filter_map(|&i| {
                let e = self.arena().get(ElementId(i))?;
                let target = e.coord().offset(step.a, step.b);
                self.arena().find(target).map(|id| id.0)
            })
            .collect()
    }

    fn metric_steps(&self, mx: f64, my: f64) -> LatticeCoord {
        LatticeCoord::new(
            (mx / self.lattice().pitch()).round() as i32,
            (my / self.lattice().row_pitch()).round() as i32,
        )
    }
}
