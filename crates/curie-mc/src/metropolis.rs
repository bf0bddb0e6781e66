//! The Metropolis accept/reject rule for single-site spin flips.

use curie_core::Spin;
use curie_lattice::Lattice;
use rand::{Rng, RngExt};
use rand_chacha::ChaCha8Rng;

/// A single-site spin-update rule.
///
/// This is the seam between the physical model and the execution
/// strategies: every strategy drives the lattice exclusively through an
/// update rule, so the acceptance algorithm can change without touching
/// the sweep machinery.
///
/// # Contract
///
/// - [`decide()`](UpdateRule::decide) MUST be a pure function of its
///   arguments and the RNG stream — no hidden state. The sweep kernels
///   rely on this to run the same rule in place, against a frozen view,
///   or inside a device dispatch.
/// - Concurrent callers MUST pass independent RNG streams (see
///   `curie_core::streams`); sharing a stream across execution units
///   correlates their acceptance draws.
pub trait UpdateRule: Send + Sync {
    /// Name for logs and reports.
    fn name(&self) -> &str;

    /// Decide the next value of a site from its current spin and the
    /// neighbor sum it observes.
    fn decide(&self, spin: Spin, neighbour_sum: i32, temperature: f64, rng: &mut ChaCha8Rng)
        -> Spin;

    /// Apply the rule at `(row, col)`, mutating the lattice in place.
    /// Returns `true` if the site flipped.
    fn update_site(&self, lattice: &mut Lattice, row: u32, col: u32, rng: &mut ChaCha8Rng) -> bool {
        let spin = lattice.spin(row, col);
        let next = self.decide(
            spin,
            lattice.neighbour_sum(row, col),
            lattice.temperature(),
            rng,
        );
        if next != spin {
            lattice.set_spin(row, col, next);
            true
        } else {
            false
        }
    }
}

/// The Metropolis acceptance rule.
///
/// Flipping a site against neighbor sum `S` costs `dE = 2 * s * S`. The
/// flip is accepted unconditionally when `dE ≤ 0`, and otherwise with
/// probability `exp(-dE / T)` against a uniform `[0, 1)` draw. At `T = 0`
/// every `dE > 0` is rejected — the deterministic zero-temperature limit.
#[derive(Clone, Copy, Debug, Default)]
pub struct Metropolis;

impl Metropolis {
    /// Energy change for flipping a spin `s` against neighbor sum `S`:
    /// `dE = 2 * s * S`.
    #[inline]
    pub fn delta_e(spin: Spin, neighbour_sum: i32) -> f64 {
        2.0 * f64::from(spin.value()) * f64::from(neighbour_sum)
    }

    /// The pure acceptance threshold: whether a flip costing `d_e` is
    /// accepted at `temperature` given a uniform `[0, 1)` `draw`.
    ///
    /// Split out from [`decide`](UpdateRule::decide) so the threshold
    /// logic is testable without an RNG.
    #[inline]
    pub fn accepts(d_e: f64, temperature: f64, draw: f64) -> bool {
        if d_e <= 0.0 {
            return true;
        }
        if temperature == 0.0 {
            return false;
        }
        draw < (-d_e / temperature).exp()
    }
}

impl UpdateRule for Metropolis {
    fn name(&self) -> &str {
        "metropolis"
    }

    fn decide(
        &self,
        spin: Spin,
        neighbour_sum: i32,
        temperature: f64,
        rng: &mut ChaCha8Rng,
    ) -> Spin {
        let d_e = Self::delta_e(spin, neighbour_sum);
        // Draw only on the probabilistic branch: downhill flips and the
        // zero-temperature limit consume no randomness.
        let accept = if d_e <= 0.0 {
            true
        } else if temperature == 0.0 {
            false
        } else {
            Self::accepts(d_e, temperature, rng.random::<f64>())
        };
        if accept {
            spin.flipped()
        } else {
            spin
        }
    }
}
