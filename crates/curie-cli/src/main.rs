//! Thin command-line driver for the curie Ising simulator.
//!
//! Parses and validates arguments, selects an execution strategy at
//! runtime, runs it through the standard lifecycle, and reports the
//! wall-clock time. Everything else lives in the library crates.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use curie::cluster::Distributed;
use curie::engine::{Device, RunReport, Sequential, SimConfig, SimError, SimState, Strategy, Threaded};
use curie::lattice::Boundary;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Single-threaded raster sweeps.
    Sequential,
    /// Shared-memory checkerboard sweeps across worker threads.
    Threaded,
    /// Site-parallel double-buffered sweeps (device contract).
    Device,
    /// Master/worker ranks with full-grid resync per sweep.
    Distributed,
}

#[derive(Parser, Debug)]
#[command(name = "curie", version, about = "2D Ising-model Monte-Carlo simulator")]
struct Cli {
    /// Execution strategy.
    #[arg(long, value_enum, default_value = "sequential")]
    strategy: StrategyArg,

    /// Lattice edge length; the grid is size × size.
    #[arg(long, default_value_t = 64)]
    size: u32,

    /// Number of Monte-Carlo sweeps.
    #[arg(long, default_value_t = 1000)]
    sweeps: u64,

    /// Temperature in reduced units (critical ≈ 2.27).
    #[arg(long, default_value_t = 2.27)]
    temperature: f64,

    /// Seed for every RNG stream in the run.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Worker threads for --strategy threaded (0 = auto-detect).
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Worker ranks for --strategy distributed.
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Run label used in snapshot output.
    #[arg(long, default_value = "ising")]
    name: String,

    /// Snapshot output path, written once cleared and once completed.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Use open (non-periodic) boundaries instead of the default torus.
    #[arg(long)]
    open_boundary: bool,
}

fn run(cli: Cli) -> Result<RunReport, SimError> {
    let boundary = if cli.open_boundary {
        Boundary::Open
    } else {
        Boundary::Periodic
    };
    let mut config = SimConfig::new(&cli.name, cli.size, cli.sweeps, cli.temperature)
        .with_seed(cli.seed)
        .with_boundary(boundary);
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }

    let strategy: Box<dyn Strategy> = match cli.strategy {
        StrategyArg::Sequential => Box::new(Sequential),
        StrategyArg::Threaded if cli.threads == 0 => Box::new(Threaded::auto()),
        StrategyArg::Threaded => Box::new(Threaded::new(cli.threads)),
        StrategyArg::Device => Box::new(Device),
        StrategyArg::Distributed => Box::new(Distributed::new(cli.workers)),
    };
    info!(
        strategy = strategy.name(),
        size = config.size,
        sweeps = config.sweeps,
        temperature = config.temperature,
        "starting run"
    );

    let mut state = SimState::new(config)?;
    strategy.initialise(&mut state)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let name = cli.name.clone();
    match run(cli) {
        Ok(report) => {
            println!("{name}:");
            println!("Total time: {:>12} us", report.elapsed.as_micros());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
