//! Error types for snapshot encoding and decoding.

use std::fmt;
use std::io;

use tessel_core::GridError;

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with the expected `b"TSSL"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// The payload could not be decoded (truncated, unknown tag, or
    /// inconsistent with the requested lattice).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The payload does not hash to the stored trailer.
    ChecksumMismatch {
        /// Hash stored in the trailer.
        stored: u64,
        /// Hash of the payload as read.
        computed: u64,
    },
    /// The decoded records do not form a valid grid.
    Grid(GridError),
}

impl SnapshotError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"TSSL\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed snapshot: {detail}"),
            Self::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch: stored={stored:#018x}, computed={computed:#018x}"
            ),
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<GridError> for SnapshotError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
