//! Device-style execution: the GPU-contract strategy.
//!
//! One logical lane per site, two checkerboard kernel dispatches per sweep
//! over a double buffer, host transfers only at sweep boundaries. The
//! kernel-launch mechanics themselves are an external concern; this module
//! implements the contract those kernels must observe, executing the lanes
//! on the host.

use curie_core::streams::dispatch_rng;
use curie_core::Spin;
use curie_lattice::{neighbour_sum_of, Boundary};
use curie_mc::{Color, Metropolis, UpdateRule};
use tracing::trace;

use crate::state::SimState;
use crate::strategy::{SimError, Strategy};

/// One checkerboard kernel dispatch: every lane reads `front`, writes its
/// own cell of `back`.
///
/// Lanes of the non-matching color copy their cell through unchanged.
/// Matching lanes re-derive their RNG stream from
/// `(seed, lane, dispatch)` — lanes carry no state between dispatches, so
/// independence and determinism both come from the derivation.
///
/// Returns the number of flipped lanes.
fn launch_color_dispatch(
    front: &[Spin],
    back: &mut [Spin],
    size: u32,
    temperature: f64,
    boundary: Boundary,
    color: Color,
    seed: u64,
    dispatch: u64,
) -> u64 {
    let cols = size as usize;
    let mut flips = 0u64;
    for lane in 0..front.len() {
        let row = (lane / cols) as u32;
        let col = (lane % cols) as u32;
        let spin = front[lane];
        let next = if color.matches(row, col) {
            let mut rng = dispatch_rng(seed, lane as u64, dispatch);
            Metropolis.decide(
                spin,
                neighbour_sum_of(front, size, boundary, row, col),
                temperature,
                &mut rng,
            )
        } else {
            spin
        };
        if next != spin {
            flips += 1;
        }
        back[lane] = next;
    }
    flips
}

/// Device strategy: site-parallel double-buffered sweeps.
///
/// Per sweep: dispatch the even-color kernel (read `front`, write `back`),
/// swap buffers, dispatch the odd-color kernel, swap again, then read the
/// grid back to the host lattice and sample statistics. The color split
/// serves the same purpose as in [`Threaded`](crate::Threaded): all
/// concurrent lanes update sites whose neighbors are untouched within the
/// dispatch, so the sweep is statistically equivalent to a sequential
/// checkerboard sweep.
#[derive(Clone, Copy, Debug, Default)]
pub struct Device;

impl Strategy for Device {
    fn name(&self) -> &str {
        "device"
    }

    fn simulate(&self, state: &mut SimState) -> Result<(), SimError> {
        let size = state.lattice().size();
        let temperature = state.lattice().temperature();
        let boundary = state.lattice().boundary();
        let seed = state.seed();

        // Host → device upload, once.
        let mut front: Vec<Spin> = state.lattice().spins().to_vec();
        let mut back = front.clone();

        for sweep in 0..state.sweeps() {
            let mut sweep_flips = 0u64;
            for (pass, color) in Color::both().into_iter().enumerate() {
                let dispatch = sweep * 2 + pass as u64;
                sweep_flips += launch_color_dispatch(
                    &front,
                    &mut back,
                    size,
                    temperature,
                    boundary,
                    color,
                    seed,
                    dispatch,
                );
                std::mem::swap(&mut front, &mut back);
            }

            // Device → host readback at the sweep boundary, where the
            // statistics are taken.
            state.lattice_mut().spins_mut().copy_from_slice(&front);
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
