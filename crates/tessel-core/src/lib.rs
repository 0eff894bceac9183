//! Core types and error taxonomy for the Tessel grid engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types shared by every other Tessel crate: points and scalar ranges,
//! per-element flag sets, element and lattice identifiers, and the
//! [`GridError`] taxonomy raised by grid construction and numeric consumers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod flags;
pub mod id;
pub mod point;

pub use error::GridError;
pub use flags::ElementFlags;
pub use id::{ElementId, LatticeCoord, NO_NEIGHBOUR};
pub use point::{Point2, Point3, ScalarRange};
