//! Flat, index-aligned arrays for numeric consumers.
//!
//! A [`DenseGrid`] is a read-only export of the element arena: one entry per
//! element in raster order, neighbour relations as dense indices with the
//! [`NO_NEIGHBOUR`] sentinel. It is rebuilt whenever the grid is reduced or
//! its flags change.

use tessel_core::{ElementFlags, GridError, ScalarRange, NO_NEIGHBOUR};

use crate::arena::ElementArena;
use crate::lattice::{Lattice, LatticeKind};

/// Parallel per-element arrays plus the scalars a numeric kernel needs.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseGrid {
    kind: LatticeKind,
    degree: usize,
    pitch: f64,
    row_pitch: f64,
    z: f64,
    x: Vec<f64>,
    y: Vec<f64>,
    lattice_a: Vec<i32>,
    lattice_b: Vec<i32>,
    neighbours: Vec<Vec<u32>>,
    flags: Vec<u32>,
    dist_to_boundary: Vec<f64>,
}

impl DenseGrid {
    pub(crate) fn export<L: Lattice>(arena: &ElementArena, lattice: &L, z: f64) -> Self {
        let n = arena.len();
        let mut out = Self {
            kind: L::KIND,
            degree: L::DEGREE,
            pitch: lattice.pitch(),
            row_pitch: lattice.row_pitch(),
            z,
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            lattice_a: Vec::with_capacity(n),
            lattice_b: Vec::with_capacity(n),
            neighbours: vec![Vec::with_capacity(n); L::DEGREE],
            flags: Vec::with_capacity(n),
            dist_to_boundary: Vec::with_capacity(n),
        };
        for e in arena.elements() {
            out.x.push(e.position().x);
            out.y.push(e.position().y);
            out.lattice_a.push(e.coord().a);
            out.lattice_b.push(e.coord().b);
            out.flags.push(e.flags().bits());
            out.dist_to_boundary.push(e.dist_to_boundary());
            for (dir, column) in out.neighbours.iter_mut().enumerate() {
                column.push(e.neighbour(dir).map_or(NO_NEIGHBOUR, |id| id.0));
            }
        }
        out
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `true` when the grid has no elements.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Lattice family.
    pub fn kind(&self) -> LatticeKind {
        self.kind
    }

    /// Number of neighbour directions.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Centre-to-centre spacing along a row.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Row spacing.
    pub fn row_pitch(&self) -> f64 {
        self.row_pitch
    }

    /// Constant z of the grid plane.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Element x centres.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Element y centres.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// First lattice coordinate (`r` on hex, `xi` on rect).
    pub fn lattice_a(&self) -> &[i32] {
        &self.lattice_a
    }

    /// Second lattice coordinate (`g` on hex, `yi` on rect).
    pub fn lattice_b(&self) -> &[i32] {
        &self.lattice_b
    }

    /// Third cube coordinate `-a - b`; only meaningful on hex grids.
    pub fn lattice_c(&self) -> Vec<i32> {
        self.lattice_a
            .iter()
            .zip(&self.lattice_b)
            .map(|(a, b)| -a - b)
            .collect()
    }

    /// Neighbour indices in direction `dir`, [`NO_NEIGHBOUR`] where absent.
    ///
    /// # Panics
    ///
    /// Panics if `dir >= self.degree()`.
    pub fn neighbours(&self, dir: usize) -> &[u32] {
        &self.neighbours[dir]
    }

    /// Neighbour of element `i` in direction `dir`.
    pub fn neighbour(&self, i: usize, dir: usize) -> Option<u32> {
        self.neighbours
            .get(dir)
            .and_then(|column| column.get(i))
            .copied()
            .filter(|&n| n != NO_NEIGHBOUR)
    }

    /// Raw flag words.
    pub fn flags(&self) -> &[u32] {
        &self.flags
    }

    /// Flags of element `i`.
    pub fn element_flags(&self, i: usize) -> ElementFlags {
        ElementFlags::from_bits_truncate(self.flags[i])
    }

    /// `true` if element `i` lies on the boundary ring.
    pub fn is_boundary(&self, i: usize) -> bool {
        self.element_flags(i).contains(ElementFlags::IS_BOUNDARY)
    }

    /// Distance to the nearest boundary element; `-100` outside.
    pub fn dist_to_boundary(&self) -> &[f64] {
        &self.dist_to_boundary
    }

    /// Indices of elements carrying every bit of `flag`.
    pub fn indices_with(&self, flag: ElementFlags) -> Vec<u32> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, bits)| ElementFlags::from_bits_truncate(**bits).contains(flag))
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Range of x centres.
    pub fn x_range(&self) -> ScalarRange {
        ScalarRange::from_values(self.x.iter().copied())
    }

    /// Range of y centres.
    pub fn y_range(&self) -> ScalarRange {
        ScalarRange::from_values(self.y.iter().copied())
    }

    /// Reject a per-element buffer whose length is not [`len`](Self::len).
    pub fn check_len(&self, what: &'static str, found: usize) -> Result<(), GridError> {
        if found != self.len() {
            return Err(GridError::SizeMismatch {
                what,
                expected: self.len(),
                found,
            });
        }
        Ok(())
    }
}
