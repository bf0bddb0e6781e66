//! Lattice state for the curie Ising simulator.
//!
//! [`Lattice`] owns the dense `size × size` spin grid, the temperature,
//! and the boundary convention for neighbor lookup. [`Observables`] and
//! [`SampleHistory`] collect the aggregate statistics that every execution
//! strategy samples once per sweep.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod grid;
pub mod stats;

pub use boundary::Boundary;
pub use grid::{neighbour_sum_of, Lattice, LatticeError};
pub use stats::{HistoryError, Observables, SampleHistory};
