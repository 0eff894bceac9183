//! Snapshot writer.
//!
//! [`SnapshotWriter`] encodes grids to any `Write` sink. The payload is
//! assembled in memory so its checksum can be appended as a trailer.

use std::io::Write;

use tessel_grid::{Grid, Lattice};
use tracing::debug;

use crate::codec::{encode_parts, record_len, write_u64_le, write_u8};
use crate::error::SnapshotError;
use crate::hash::fnv1a;
use crate::{FORMAT_VERSION, MAGIC};

/// Writes grid snapshots to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production code
/// can use `BufWriter<File>`. Each call to
/// [`write_grid`](Self::write_grid) emits one complete snapshot.
///
/// # Examples
///
/// ```
/// use tessel_core::Point2;
/// use tessel_grid::{GridConfig, HexGrid};
/// use tessel_snapshot::{SnapshotReader, SnapshotWriter};
///
/// let mut grid = HexGrid::new(GridConfig::hex(0.5, 8.0)).unwrap();
/// grid.set_circular_boundary(3.0, Point2::ZERO).unwrap();
///
/// let mut buf = Vec::new();
/// SnapshotWriter::new(&mut buf).write_grid(&grid).unwrap();
///
/// let back: HexGrid = SnapshotReader::open(buf.as_slice())
///     .unwrap()
///     .read_grid()
///     .unwrap();
/// assert_eq!(back.dense(), grid.dense());
/// ```
pub struct SnapshotWriter<W: Write> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> SnapshotWriter<W> {
    /// Wrap a sink. Nothing is written until [`write_grid`](Self::write_grid).
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Encode `grid` as one snapshot: header, payload and checksum.
    pub fn write_grid<L: Lattice>(&mut self, grid: &Grid<L>) -> Result<(), SnapshotError> {
        let parts = grid.to_parts();
        let mut payload = Vec::with_capacity(96 + parts.elements.len() * record_len(L::KIND));
        encode_parts(&mut payload, L::KIND, &parts)?;
        let checksum = fnv1a(&payload);

        self.writer.write_all(&MAGIC)?;
        write_u8(&mut self.writer, FORMAT_VERSION)?;
        self.writer.write_all(&payload)?;
        write_u64_le(&mut self.writer, checksum)?;

        let total = (MAGIC.len() + 1 + payload.len() + 8) as u64;
        self.bytes_written += total;
        debug!(
            kind = %L::KIND,
            elements = parts.elements.len(),
            bytes = total,
            checksum = format_args!("{checksum:#018x}"),
            "snapshot written"
        );
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), SnapshotError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Total bytes emitted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
