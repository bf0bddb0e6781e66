//! curie: a 2D Ising-model Monte-Carlo simulator.
//!
//! One shared physical model — the spin lattice, the Metropolis update
//! rule, per-sweep energy/magnetization observables — behind four
//! interchangeable execution strategies: sequential, shared-memory
//! threads, device-style lanes, and distributed message-passing ranks.
//!
//! This is the top-level facade crate re-exporting the public API from the
//! curie sub-crates; for most users a single `curie` dependency is enough.
//!
//! # Quick start
//!
//! ```
//! use curie::engine::{Sequential, SimConfig, SimState, Strategy};
//!
//! // A 16×16 periodic lattice, 100 sweeps at T = 2.0.
//! let config = SimConfig::new("quick", 16, 100, 2.0).with_seed(7);
//! let mut state = SimState::new(config).unwrap();
//! let report = Sequential.initialise(&mut state).unwrap();
//!
//! assert!(state.complete());
//! assert_eq!(report.sweeps, 100);
//! assert_eq!(state.history().magnetism().len(), 100);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: ids, spins, partitioning, RNG streams.
pub mod types {
    pub use curie_core::*;
}

/// The lattice, boundary conventions, and observables.
pub mod lattice {
    pub use curie_lattice::*;
}

/// The Metropolis rule and sweep kernels.
pub mod mc {
    pub use curie_mc::*;
}

/// Binary snapshot persistence.
pub mod snapshot {
    pub use curie_snapshot::*;
}

/// Run state and the local execution strategies.
pub mod engine {
    pub use curie_engine::*;
}

/// The distributed execution strategy and its protocol.
pub mod cluster {
    pub use curie_cluster::*;
}

/// The most common imports in one place.
pub mod prelude {
    pub use curie_cluster::Distributed;
    pub use curie_core::Spin;
    pub use curie_engine::{Device, RunReport, Sequential, SimConfig, SimError, SimState, Strategy, Threaded};
    pub use curie_lattice::{Boundary, Lattice, Observables};
    pub use curie_mc::{Metropolis, UpdateRule};
}
