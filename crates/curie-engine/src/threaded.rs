//! Shared-memory execution: row blocks across worker threads.

use std::thread;

use curie_core::partition::RowPartition;
use curie_core::streams::lane_rng;
use curie_mc::{frozen_color_pass, Color, Metropolis};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::state::SimState;
use crate::strategy::{SimError, Strategy};

/// Shared-memory strategy: contiguous row blocks across worker threads.
///
/// Concurrent neighbor reads against in-place writes are the hazard here;
/// the discipline is **checkerboard ordering**. Each sweep runs two color
/// passes (even sites, then odd). Within a pass every thread reads a frozen
/// copy of the grid taken at pass start and writes only its own row block;
/// since every neighbor of an updated site has the other color, frozen
/// reads equal live reads, and the scoped-thread join between passes is the
/// barrier. Per-sweep semantics match a sequential checkerboard sweep.
///
/// Each thread owns an independent RNG stream (`lane = 1 + block index`).
#[derive(Clone, Copy, Debug)]
pub struct Threaded {
    threads: usize,
}

impl Threaded {
    /// A strategy with the given worker thread count (minimum 1). The
    /// effective count is also capped by the row count, so every thread
    /// owns at least one row.
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Auto-detect a worker count from available parallelism, clamped to
    /// `[1, 16]`.
    pub fn auto() -> Self {
        let cpus = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(cpus.clamp(1, 16))
    }

    /// Configured worker thread count.
    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl Strategy for Threaded {
    fn name(&self) -> &str {
        "threaded"
    }

    fn simulate(&self, state: &mut SimState) -> Result<(), SimError> {
        let size = state.lattice().size();
        let temperature = state.lattice().temperature();
        let boundary = state.lattice().boundary();
        let seed = state.seed();

        let blocks = self.threads.min(size as usize);
        let partition = RowPartition::build(size, blocks).map_err(|e| SimError::Aborted {
            strategy: self.name().to_string(),
            reason: e.to_string(),
        })?;
        let mut rngs: Vec<ChaCha8Rng> = (0..blocks)
            .map(|b| lane_rng(seed, 1 + b as u64))
            .collect();

        for sweep in 0..state.sweeps() {
            let mut sweep_flips = 0u64;
            for color in Color::both() {
                let frozen = state.lattice().spins().to_vec();
                let spins = state.lattice_mut().spins_mut();
                let block_slices = partition.split_rows_mut(size as usize, spins);

                let (pass_flips, panicked) = thread::scope(|s| {
                    let mut handles = Vec::with_capacity(blocks);
                    for ((block, &range), rng) in block_slices
                        .into_iter()
                        .zip(partition.ranges())
                        .zip(rngs.iter_mut())
                    {
                        let frozen = &frozen;
                        handles.push(s.spawn(move || {
                            frozen_color_pass(
                                &Metropolis,
                                frozen,
                                size,
                                temperature,
                                boundary,
                                range,
                                block,
                                color,
                                rng,
                            )
                        }));
                    }
                    let mut flips = 0u64;
                    let mut panicked = false;
                    for handle in handles {
                        match handle.join() {
                            Ok(f) => flips += f,
                            Err(_) => panicked = true,
                        }
                    }
                    (flips, panicked)
                });
                if panicked {
                    return Err(SimError::Aborted {
                        strategy: self.name().to_string(),
                        reason: "worker thread panicked mid-pass".to_string(),
                    });
                }
                sweep_flips += pass_flips;
            }

            let sample = state.record_sample()?;
            trace!(
                sweep,
                flips = sweep_flips,
                energy = sample.energy,
                magnetism = sample.magnetism,
                "sweep done"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn thread_count_is_clamped_to_rows() {
        // 4-row lattice with 16 requested threads: runs with 4 blocks
        // rather than rejecting or leaving threads idle.
        let mut state = SimState::new(SimConfig::new("clamp", 4, 10, 2.0)).unwrap();
        Threaded::new(16).initialise(&mut state).unwrap();
        assert_eq!(state.history().len(), 10);
    }

    #[test]
    fn history_lengths_match_sweep_count() {
        let mut state = SimState::new(SimConfig::new("thr", 12, 30, 2.5)).unwrap();
        Threaded::new(3).initialise(&mut state).unwrap();
        assert_eq!(state.history().energy().len(), 30);
        assert_eq!(state.history().magnetism().len(), 30);
    }

    #[test]
    fn zero_temperature_keeps_aligned_grid_frozen() {
        let mut state = SimState::new(SimConfig::new("frozen", 12, 15, 0.0)).unwrap();
        Threaded::new(4).simulate(&mut state).unwrap();
        assert!(state.history().magnetism().iter().all(|&m| m == 144.0));
    }

    #[test]
    fn same_seed_and_thread_count_reproduce_the_run() {
        let run = || {
            let mut state =
                SimState::new(SimConfig::new("det", 10, 20, 2.0).with_seed(5)).unwrap();
            Threaded::new(3).initialise(&mut state).unwrap();
            state.lattice().spins().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn magnetism_stays_bounded_through_a_hot_run() {
        let mut state = SimState::new(SimConfig::new("hot", 16, 40, 4.0)).unwrap();
        Threaded::new(4).initialise(&mut state).unwrap();
        assert!(state
            .history()
            .magnetism()
            .iter()
            .all(|&m| m.abs() <= 256.0));
    }
}
