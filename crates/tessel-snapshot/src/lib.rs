//! Binary persistence for Tessel grids.
//!
//! Saves a fitted and reduced grid (its build parameters, centroids and
//! every element with its flags, boundary distance and neighbour indices)
//! and loads it back without re-running boundary fitting.
//!
//! # Architecture
//!
//! - [`SnapshotWriter`] encodes grids to any `Write` sink
//! - [`SnapshotReader`] validates and decodes from any `Read` source
//! - [`save`] and [`load`] wrap both around buffered files
//! - [`grid_hash`] fingerprints the dense export for equality checks
//!
//! # Format
//!
//! ```text
//! [MAGIC "TSSL"] [VERSION u8] [payload ...] [FNV-1a u64 of payload]
//! ```
//!
//! The payload holds the lattice kind tag, the grid parameters, both
//! centroids, the element count and one record per element in dense order.
//! All integers and floats are little-endian.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;
pub mod reader;
pub mod writer;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tessel_grid::{Grid, Lattice};

pub use error::SnapshotError;
pub use hash::{fnv1a, grid_hash};
pub use reader::SnapshotReader;
pub use writer::SnapshotWriter;

/// Magic bytes at the start of every snapshot.
pub const MAGIC: [u8; 4] = *b"TSSL";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Write `grid` to a new file at `path`, replacing any existing file.
pub fn save<L: Lattice>(path: impl AsRef<Path>, grid: &Grid<L>) -> Result<(), SnapshotError> {
    let file = File::create(path.as_ref())?;
    let mut writer = SnapshotWriter::new(BufWriter::new(file));
    writer.write_grid(grid)?;
    writer.flush()
}

/// Read a grid of lattice `L` from the file at `path`.
pub fn load<L: Lattice>(path: impl AsRef<Path>) -> Result<Grid<L>, SnapshotError> {
    let file = File::open(path.as_ref())?;
    SnapshotReader::open(BufReader::new(file))?.read_grid()
}
