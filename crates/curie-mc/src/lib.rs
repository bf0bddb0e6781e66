//! Monte-Carlo machinery for the curie Ising simulator.
//!
//! [`Metropolis`] implements the single-site accept/reject rule behind the
//! [`UpdateRule`] seam; [`sweep`] holds the site-visit kernels (raster,
//! row-range, and checkerboard passes) that every execution strategy drives
//! the lattice through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod metropolis;
pub mod sweep;

pub use metropolis::{Metropolis, UpdateRule};
pub use sweep::{frozen_color_pass, range_sweep, raster_sweep, Color};
