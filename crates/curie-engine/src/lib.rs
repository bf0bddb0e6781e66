//! Execution strategies and run state for the curie Ising simulator.
//!
//! One shared physical model — the lattice, the Metropolis rule, the
//! per-sweep observables — behind interchangeable execution strategies
//! selected at runtime. This crate holds the validated configuration
//! ([`SimConfig`]), the run state ([`SimState`]), the [`Strategy`]
//! contract, and the local strategies: [`Sequential`], [`Threaded`]
//! (shared-memory checkerboard), and [`Device`] (GPU-contract lanes).
//! The distributed strategy lives in `curie-cluster` and implements the
//! same contract.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod device;
pub mod sequential;
pub mod state;
pub mod strategy;
pub mod threaded;

pub use config::{ConfigError, SimConfig};
pub use device::Device;
pub use sequential::Sequential;
pub use state::SimState;
pub use strategy::{RunReport, SimError, Strategy};
pub use threaded::Threaded;
