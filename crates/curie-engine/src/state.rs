//! Run-level simulation state.

use std::path::PathBuf;

use curie_core::streams::lane_rng;
use curie_lattice::{HistoryError, Lattice, Observables, SampleHistory};
use curie_snapshot::{Snapshot, SnapshotError};
use tracing::debug;

use crate::config::SimConfig;
use crate::strategy::SimError;

/// The state of one simulation run: the lattice, the per-sweep observable
/// histories, the completion flag, and the optional persistence target.
///
/// The driver exclusively owns the `SimState` for the run's duration. The
/// active strategy mutates the lattice sweep-by-sweep and records exactly
/// one sample per sweep; `complete` flips false → true once and is never
/// reversed.
#[derive(Clone, Debug)]
pub struct SimState {
    lattice: Lattice,
    identity: String,
    sweeps: u64,
    seed: u64,
    history: SampleHistory,
    complete: bool,
    output: Option<PathBuf>,
}

impl SimState {
    /// Build the initial (aligned) state from a validated configuration.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let lattice = Lattice::new(config.size, config.temperature, config.boundary)
            .map_err(crate::config::ConfigError::from)?;
        Ok(Self {
            lattice,
            identity: config.identity,
            sweeps: config.sweeps,
            seed: config.seed,
            history: SampleHistory::new(config.sweeps),
            complete: false,
            output: config.output,
        })
    }

    /// The lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Mutable access to the lattice for the active strategy.
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    /// Simulation name used for output labeling.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Number of sweeps this run executes.
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// The run seed; all RNG streams derive from it.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the run has finished.
    pub fn complete(&self) -> bool {
        self.complete
    }

    /// The recorded observable histories.
    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Randomize every spin (uniform ±1, RNG lane 0) and reset the
    /// histories and completion flag.
    pub fn clear(&mut self) {
        let mut rng = lane_rng(self.seed, 0);
        self.lattice.randomize(&mut rng);
        self.history.clear();
        self.complete = false;
        debug!(identity = %self.identity, size = self.lattice.size(), "lattice cleared");
    }

    /// Persist a snapshot to the output path, if one is configured.
    ///
    /// Idempotent: two calls without intervening mutation produce
    /// byte-identical files.
    pub fn save(&self) -> Result<(), SnapshotError> {
        let Some(path) = &self.output else {
            return Ok(());
        };
        let snapshot = Snapshot {
            identity: self.identity.clone(),
            size: self.lattice.size(),
            complete: self.complete,
            spins: self.lattice.spins().to_vec(),
        };
        snapshot.write_to_path(path)?;
        debug!(identity = %self.identity, path = %path.display(), complete = self.complete, "snapshot written");
        Ok(())
    }

    /// Measure the current grid and append the sample to the histories.
    pub fn record_sample(&mut self) -> Result<Observables, HistoryError> {
        let sample = Observables::measure(&self.lattice);
        self.history.push(sample)?;
        Ok(sample)
    }

    /// Mark the run finished. Monotonic: there is no way back to false.
    pub fn set_complete(&mut self) {
        self.complete = true;
    }
}
