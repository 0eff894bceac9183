//! Error types for the Tessel grid engine.
//!
//! Every failure is raised synchronously at the point of detection. A grid
//! that fails to build has no usable partial state, so none of these are
//! retried internally.

use std::error::Error;
use std::fmt;

/// Errors from grid construction, boundary fitting, numeric operations and
/// persisted-grid reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Pitch, span, domain shape or wrap mode cannot form a valid grid, or
    /// two grids that must agree (e.g. convolution operands) do not.
    Configuration {
        /// What was inconsistent.
        reason: String,
    },
    /// The fitted boundary does not form one closed ring of elements.
    BoundaryNotContiguous {
        /// Number of boundary-flagged elements.
        flagged: usize,
        /// Number of those reached by the contiguity traversal.
        reached: usize,
    },
    /// A client array does not have one entry per live element, or the
    /// same storage was passed as both input and output.
    SizeMismatch {
        /// Which argument was wrong.
        what: &'static str,
        /// The length the grid requires.
        expected: usize,
        /// The length supplied.
        found: usize,
    },
    /// A persisted neighbour reference does not resolve to a stored element.
    LoadIntegrity {
        /// Dense index of the element holding the reference.
        element: u32,
        /// Neighbour direction of the reference.
        direction: usize,
        /// The unmatched neighbour index.
        neighbour: u32,
    },
}

impl GridError {
    /// Shorthand for a [`GridError::Configuration`] with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "grid configuration error: {reason}"),
            Self::BoundaryNotContiguous { flagged, reached } => write!(
                f,
                "boundary is not contiguous: traversal reached {reached} of {flagged} boundary elements"
            ),
            Self::SizeMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "size mismatch for {what}: expected {expected} elements, found {found}"
            ),
            Self::LoadIntegrity {
                element,
                direction,
                neighbour,
            } => write!(
                f,
                "failed to match neighbour {neighbour} of element {element} in direction {direction}"
            ),
        }
    }
}

impl Error for GridError {}
