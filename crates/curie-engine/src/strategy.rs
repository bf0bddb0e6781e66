//! The execution-strategy contract.

use std::fmt;
use std::time::{Duration, Instant};

use curie_lattice::HistoryError;
use curie_snapshot::SnapshotError;
use tracing::info;

use crate::config::ConfigError;
use crate::state::SimState;

// ── SimError ────────────────────────────────────────────────────

/// Fatal simulation errors.
///
/// There is no recoverable error path inside a run: a rejected
/// configuration, a failed snapshot write, a history overflow, or a
/// strategy abort (the distributed variant maps every communication
/// failure here) all terminate the run.
#[derive(Debug)]
pub enum SimError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// Snapshot persistence failed.
    Snapshot(SnapshotError),
    /// A strategy tried to record more samples than sweeps.
    History(HistoryError),
    /// A strategy aborted the run.
    Aborted {
        /// Name of the aborting strategy.
        strategy: String,
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Snapshot(e) => write!(f, "snapshot failed: {e}"),
            Self::History(e) => write!(f, "history overflow: {e}"),
            Self::Aborted { strategy, reason } => {
                write!(f, "strategy '{strategy}' aborted: {reason}")
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::History(e) => Some(e),
            Self::Aborted { .. } => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SnapshotError> for SimError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

impl From<HistoryError> for SimError {
    fn from(e: HistoryError) -> Self {
        Self::History(e)
    }
}

// ── RunReport ───────────────────────────────────────────────────

/// Wall-clock report for a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Name of the strategy that ran.
    pub strategy: String,
    /// Wall-clock time spent inside `simulate()`.
    pub elapsed: Duration,
    /// Number of sweeps executed.
    pub sweeps: u64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} sweeps in {:>12} us",
            self.strategy,
            self.sweeps,
            self.elapsed.as_micros()
        )
    }
}

// ── Strategy ────────────────────────────────────────────────────

/// An execution strategy: one way of running `sweeps` Monte-Carlo sweeps
/// over a [`SimState`].
///
/// # Contract
///
/// - `simulate()` runs exactly `state.sweeps()` sweeps and records exactly
///   one observable sample per sweep.
/// - All strategies are statistically interchangeable for identical
///   `(size, temperature, sweeps)`; they are not bit-reproducible against
///   each other.
/// - A sweep is the minimal unit of atomic progress: nothing cancels
///   mid-sweep, and failures abort the whole run.
///
/// # Object safety
///
/// The trait is object-safe; drivers hold strategies as
/// `Box<dyn Strategy>` and select one at startup.
pub trait Strategy {
    /// Strategy name for reports and logs.
    fn name(&self) -> &str;

    /// Run exactly `state.sweeps()` sweeps, recording one sample each.
    fn simulate(&self, state: &mut SimState) -> Result<(), SimError>;

    /// The full driver contract: clear the lattice, persist the cleared
    /// grid, run the timed simulation, mark completion, persist again.
    fn initialise(&self, state: &mut SimState) -> Result<RunReport, SimError> {
        state.clear();
        state.save()?;

        let started = Instant::now();
        self.simulate(state)?;
        let elapsed = started.elapsed();

        state.set_complete();
        state.save()?;

        let report = RunReport {
            strategy: self.name().to_string(),
            elapsed,
            sweeps: state.sweeps(),
        };
        info!(strategy = self.name(), elapsed_us = elapsed.as_micros() as u64, sweeps = state.sweeps(), "run complete");
        Ok(report)
    }
}
