//! Benchmark profiles for the curie Ising simulator.
//!
//! Pre-built lattices and configurations shared by the criterion benches:
//!
//! - [`reference_lattice`]: 64×64 periodic grid near the critical point
//! - [`stress_lattice`]: 256×256 periodic grid (64K sites)
//! - [`reference_config`]: matching [`SimConfig`] for whole-run benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use curie_core::streams::lane_rng;
use curie_engine::SimConfig;
use curie_lattice::{Boundary, Lattice};

/// Reference lattice: 64×64 periodic at the critical temperature, randomized
/// from a fixed seed.
pub fn reference_lattice() -> Lattice {
    build(64, 2.27)
}

/// Stress lattice: 256×256 periodic (64K sites), randomized from a fixed
/// seed.
pub fn stress_lattice() -> Lattice {
    build(256, 2.27)
}

/// A run configuration matching [`reference_lattice`].
pub fn reference_config(sweeps: u64) -> SimConfig {
    SimConfig::new("bench", 64, sweeps, 2.27).with_seed(1)
}

fn build(size: u32, temperature: f64) -> Lattice {
    let mut lattice = Lattice::new(size, temperature, Boundary::Periodic).unwrap();
    lattice.randomize(&mut lane_rng(1, 0));
    lattice
}
