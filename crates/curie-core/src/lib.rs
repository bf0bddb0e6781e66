//! Core types for the curie Ising simulator.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by every execution strategy: strongly-typed ids, the
//! [`Spin`] value type, balanced row partitioning for the parallel and
//! distributed variants, and deterministic RNG stream derivation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod partition;
pub mod spin;
pub mod streams;

pub use id::{SweepId, WorkerId};
pub use partition::{PartitionError, RowPartition, RowRange};
pub use spin::Spin;
