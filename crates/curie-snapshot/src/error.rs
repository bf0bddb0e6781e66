//! Error types for snapshot encode/decode.

use std::fmt;
use std::io;

/// Errors from writing or reading a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// The stream does not start with the snapshot magic.
    BadMagic {
        /// The four bytes found instead.
        found: [u8; 4],
    },
    /// The format version is newer than this build understands.
    UnsupportedVersion {
        /// The version found in the header.
        found: u32,
    },
    /// Structurally invalid data past the header.
    MalformedRecord {
        /// Human-readable description of the problem.
        detail: String,
    },
    /// A spin byte decoded to something other than ±1.
    SpinOutOfRange {
        /// Flat index of the offending cell.
        index: usize,
        /// The byte found.
        byte: u8,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::BadMagic { found } => write!(f, "bad snapshot magic: {found:?}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported snapshot format version {found}")
            }
            Self::MalformedRecord { detail } => write!(f, "malformed snapshot: {detail}"),
            Self::SpinOutOfRange { index, byte } => {
                write!(f, "spin at cell {index} decodes to {byte:#04x}, expected ±1")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
