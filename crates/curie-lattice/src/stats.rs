//! Aggregate observables sampled once per sweep.

use std::fmt;

use crate::grid::Lattice;

// ── Observables ─────────────────────────────────────────────────

/// One per-sweep statistics sample: total bond energy and net magnetization.
///
/// Both are raw sums (per-bond and per-site respectively), not densities;
/// consumers normalize by `size²` where they need intensive quantities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observables {
    /// Total bond energy, each unordered bond counted once.
    pub energy: f64,
    /// Net magnetization, the sum of all spin values.
    pub magnetism: f64,
}

impl Observables {
    /// Sample the current grid state.
    pub fn measure(lattice: &Lattice) -> Self {
        Self {
            energy: lattice.energy(),
            magnetism: lattice.magnetism(),
        }
    }
}

// ── HistoryError ────────────────────────────────────────────────

/// Error from recording beyond a history's fixed capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryError {
    /// The capacity that would have been exceeded.
    pub capacity: u64,
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample history is full: capacity {} samples",
            self.capacity
        )
    }
}

impl std::error::Error for HistoryError {}

// ── SampleHistory ───────────────────────────────────────────────

/// Per-sweep observable history with a fixed capacity of one sample per
/// planned sweep.
///
/// The capacity bound is enforced at [`push`](SampleHistory::push) so a
/// buggy strategy cannot record more samples than sweeps; a completed run
/// holds exactly `capacity` samples in each series.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleHistory {
    energy: Vec<f64>,
    magnetism: Vec<f64>,
    capacity: u64,
}

impl SampleHistory {
    /// Create an empty history holding up to `capacity` samples.
    pub fn new(capacity: u64) -> Self {
        Self {
            energy: Vec::with_capacity(capacity as usize),
            magnetism: Vec::with_capacity(capacity as usize),
            capacity,
        }
    }

    /// Append one sample.
    pub fn push(&mut self, sample: Observables) -> Result<(), HistoryError> {
        if self.len() == self.capacity {
            return Err(HistoryError {
                capacity: self.capacity,
            });
        }
        self.energy.push(sample.energy);
        self.magnetism.push(sample.magnetism);
        Ok(())
    }

    /// Number of recorded samples.
    pub fn len(&self) -> u64 {
        self.energy.len() as u64
    }

    /// Whether no samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Whether the history holds one sample per planned sweep.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Maximum number of samples.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Energy series, one entry per completed sweep.
    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    /// Magnetization series, one entry per completed sweep.
    pub fn magnetism(&self) -> &[f64] {
        &self.magnetism
    }

    /// Discard all samples.
    pub fn clear(&mut self) {
        self.energy.clear();
        self.magnetism.clear();
    }

    /// Mean |magnetization| over the last `tail` samples (or all samples if
    /// fewer exist). Returns 0.0 for an empty history.
    ///
    /// The standard equilibrium estimate: early sweeps are still relaxing,
    /// so statistical comparisons read the tail of the series.
    pub fn mean_abs_magnetism(&self, tail: usize) -> f64 {
        if self.magnetism.is_empty() {
            return 0.0;
        }
        let start = self.magnetism.len().saturating_sub(tail.max(1));
        let window = &self.magnetism[start..];
        window.iter().map(|m| m.abs()).sum::<f64>() / window.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;

    #[test]
    fn measure_reads_the_grid() {
        let lattice = Lattice::new(4, 1.0, Boundary::Periodic).unwrap();
        let obs = Observables::measure(&lattice);
        assert_eq!(obs.energy, -32.0);
        assert_eq!(obs.magnetism, 16.0);
    }

    #[test]
    fn push_respects_capacity() {
        let mut history = SampleHistory::new(2);
        let sample = Observables {
            energy: -1.0,
            magnetism: 1.0,
        };
        history.push(sample).unwrap();
        history.push(sample).unwrap();
        assert!(history.is_full());
        assert_eq!(history.push(sample), Err(HistoryError { capacity: 2 }));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn series_track_pushes_in_order() {
        let mut history = SampleHistory::new(3);
        for i in 0..3 {
            history
                .push(Observables {
                    energy: -f64::from(i),
                    magnetism: f64::from(i),
                })
                .unwrap();
        }
        assert_eq!(history.energy(), &[0.0, -1.0, -2.0]);
        assert_eq!(history.magnetism(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn clear_resets_but_keeps_capacity() {
        let mut history = SampleHistory::new(1);
        history
            .push(Observables {
                energy: 0.0,
                magnetism: 0.0,
            })
            .unwrap();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn mean_abs_magnetism_reads_the_tail() {
        let mut history = SampleHistory::new(4);
        for m in [-8.0, 8.0, -2.0, 4.0] {
            history
                .push(Observables {
                    energy: 0.0,
                    magnetism: m,
                })
                .unwrap();
        }
        assert_eq!(history.mean_abs_magnetism(2), 3.0);
        assert_eq!(history.mean_abs_magnetism(100), 5.5);
        assert_eq!(SampleHistory::new(1).mean_abs_magnetism(2), 0.0);
    }
}
