//! Binary lattice snapshot persistence.
//!
//! A run persists its grid twice: once after clearing (the random quench)
//! and once at completion. The format is a custom little-endian binary
//! codec — magic, version, identity string, size, completion flag, spin
//! grid — with no compression, no alignment padding, and no self-describing
//! schema (and no serde dependency). Output depends only on the snapshotted
//! state, so saving twice without mutation produces byte-identical files.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod snapshot;

pub use error::SnapshotError;
pub use snapshot::Snapshot;

/// File magic at offset 0.
pub const MAGIC: [u8; 4] = *b"CURI";

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;
