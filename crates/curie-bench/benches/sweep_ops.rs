//! Criterion micro-benchmarks for sweep kernels and observables.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use curie_bench::{reference_lattice, stress_lattice};
use curie_core::partition::RowRange;
use curie_core::streams::lane_rng;
use curie_mc::{frozen_color_pass, raster_sweep, Color, Metropolis};

/// Benchmark: one full raster sweep over a 64×64 grid (4K site updates).
fn bench_raster_sweep_64(c: &mut Criterion) {
    let mut lattice = reference_lattice();
    let mut rng = lane_rng(1, 1);

    c.bench_function("raster_sweep_64", |b| {
        b.iter(|| {
            let flips = raster_sweep(&Metropolis, &mut lattice, &mut rng);
            black_box(flips);
        });
    });
}

/// Benchmark: one checkerboard color pass over the full 64×64 grid against
/// a frozen view (the shared-memory inner loop, single block).
fn bench_frozen_color_pass_64(c: &mut Criterion) {
    let mut lattice = reference_lattice();
    let size = lattice.size();
    let temperature = lattice.temperature();
    let boundary = lattice.boundary();
    let mut rng = lane_rng(1, 1);

    c.bench_function("frozen_color_pass_64", |b| {
        b.iter(|| {
            let frozen = lattice.spins().to_vec();
            let range = RowRange {
                start: 0,
                end: size,
            };
            let flips = frozen_color_pass(
                &Metropolis,
                &frozen,
                size,
                temperature,
                boundary,
                range,
                lattice.spins_mut(),
                Color::Even,
                &mut rng,
            );
            black_box(flips);
        });
    });
}

/// Benchmark: the energy observable on a 256×256 grid (64K sites, 128K
/// bonds) — the master pays this once per sweep.
fn bench_energy_256(c: &mut Criterion) {
    let lattice = stress_lattice();

    c.bench_function("energy_256", |b| {
        b.iter(|| {
            black_box(lattice.energy());
        });
    });
}

criterion_group!(
    benches,
    bench_raster_sweep_64,
    bench_frozen_color_pass_64,
    bench_energy_256
);
criterion_main!(benches);
