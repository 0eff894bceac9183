//! Element and lattice identifiers.

use std::fmt;

/// Reserved dense neighbour index meaning "no neighbour in this direction".
///
/// Never a valid dense index: grids are capped below `u32::MAX` elements.
pub const NO_NEIGHBOUR: u32 = u32::MAX;

/// Slot of an element inside a grid's element arena.
///
/// Arena slots are compacted when elements are discarded, so an `ElementId`
/// is only meaningful against the arena that issued it and only until the
/// next reduction. The stable identity of an element is its
/// [`LatticeCoord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    /// The slot as a `usize` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Integer lattice coordinates of an element.
///
/// For hexagonal lattices `a` is the axial `r` coordinate and `b` is `g`; the
/// third cube coordinate is [`LatticeCoord::third`]. For rectangular lattices
/// `a` is the column index `xi` and `b` is the row index `yi`.
///
/// Ordering is row-major from the bottom: `(b, a)` lexicographic, which is the
/// raster order used for dense index assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LatticeCoord {
    /// First axis (`r` for hex, `xi` for rect).
    pub a: i32,
    /// Second axis (`g` for hex, `yi` for rect).
    pub b: i32,
}

impl LatticeCoord {
    /// Construct a lattice coordinate.
    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// The origin element.
    pub const ORIGIN: Self = Self { a: 0, b: 0 };

    /// The third hex cube coordinate, `-a - b`.
    pub const fn third(self) -> i32 {
        -self.a - self.b
    }

    /// Offset by `(da, db)`.
    pub const fn offset(self, da: i32, db: i32) -> Self {
        Self {
            a: self.a + da,
            b: self.b + db,
        }
    }
}

impl Ord for LatticeCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.b, self.a).cmp(&(other.b, other.a))
    }
}

impl PartialOrd for LatticeCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LatticeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.a, self.b)
    }
}
