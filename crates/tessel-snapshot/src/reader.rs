//! Snapshot reader.
//!
//! [`SnapshotReader`] validates the header and checksum on
//! [`open`](SnapshotReader::open); decoding into a typed grid happens in
//! [`read_grid`](SnapshotReader::read_grid).

use std::io::Read;

use tessel_grid::{Grid, GridParts, Lattice, LatticeKind};
use tracing::{debug, info};

use crate::codec::{decode_parts, read_u8};
use crate::error::SnapshotError;
use crate::hash::fnv1a;
use crate::{FORMAT_VERSION, MAGIC};

/// Reads one grid snapshot from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production code can
/// use `BufReader<File>`. The stream is consumed to its end.
pub struct SnapshotReader<R: Read> {
    reader: R,
    kind: LatticeKind,
    parts: GridParts,
}

impl<R: Read> SnapshotReader<R> {
    /// Read the whole stream, checking magic, version and checksum, and
    /// decode the payload.
    pub fn open(mut reader: R) -> Result<Self, SnapshotError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(SnapshotError::InvalidMagic);
        }
        let version = read_u8(&mut reader)?;
        if version != FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: version });
        }

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest)?;
        if rest.len() < 8 {
            return Err(SnapshotError::malformed("missing checksum trailer"));
        }
        let (payload, trailer) = rest.split_at(rest.len() - 8);
        let mut stored = [0u8; 8];
        stored.copy_from_slice(trailer);
        let stored = u64::from_le_bytes(stored);
        let computed = fnv1a(payload);
        if stored != computed {
            return Err(SnapshotError::ChecksumMismatch { stored, computed });
        }

        let (kind, parts) = decode_parts(payload)?;
        debug!(
            %kind,
            elements = parts.elements.len(),
            bytes = payload.len(),
            "snapshot decoded"
        );
        Ok(Self {
            reader,
            kind,
            parts,
        })
    }

    /// Lattice kind recorded in the snapshot.
    pub fn kind(&self) -> LatticeKind {
        self.kind
    }

    /// Decoded records, before they are checked as a grid.
    pub fn parts(&self) -> &GridParts {
        &self.parts
    }

    /// Rebuild the grid.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Malformed`] if the snapshot holds a different
    /// lattice kind than `L`, and [`SnapshotError::Grid`] if the records do
    /// not form a valid grid (for example a neighbour index that does not
    /// match a stored element).
    pub fn read_grid<L: Lattice>(self) -> Result<Grid<L>, SnapshotError> {
        if self.kind != L::KIND {
            return Err(SnapshotError::malformed(format!(
                "snapshot holds a {} grid, {} requested",
                self.kind,
                L::KIND
            )));
        }
        let grid = Grid::<L>::from_parts(self.parts)?;
        info!(kind = %L::KIND, elements = grid.len(), "grid loaded");
        Ok(grid)
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
