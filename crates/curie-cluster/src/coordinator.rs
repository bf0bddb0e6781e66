//! Master and worker halves of the per-sweep resynchronization protocol.
//!
//! Per sweep, in lockstep:
//!
//! 1. Each worker updates every site in its row block in place, reading
//!    its full replica (the grid reconstructed at the previous barrier).
//! 2. Each worker sends each updated row individually to the master,
//!    tagged by sweep and row index.
//! 3. The master receives exactly `rows` row messages in any completion
//!    order and writes them into the authoritative grid, validating sweep
//!    tags, row bounds, and row uniqueness.
//! 4. The master samples energy and magnetization from the reconstructed
//!    grid and appends them to the histories.
//! 5. The master broadcasts the full grid; a worker overwrites its replica
//!    and only then starts the next sweep. The master cannot receive rows
//!    for sweep `i + 1` before that: a worker produces them only after its
//!    sweep-`i` sync arrived.
//!
//! Epoch 0 is the initial broadcast that distributes the cleared grid
//! before the first sweep.

use curie_core::partition::RowRange;
use curie_core::streams::lane_rng;
use curie_core::SweepId;
use curie_engine::{SimError, SimState};
use curie_lattice::Lattice;
use curie_mc::{range_sweep, Metropolis};
use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::context::{DistributedContext, Rank};
use crate::error::ClusterError;
use crate::message::{GridSync, Message, RowUpdate};
use crate::transport::{MasterEndpoint, WorkerEndpoint};

/// Map a protocol failure onto the engine's fatal error type.
pub(crate) fn abort(e: ClusterError) -> SimError {
    SimError::Aborted {
        strategy: "distributed".to_string(),
        reason: e.to_string(),
    }
}

// ── SweepCollector ──────────────────────────────────────────────

/// Accumulates one sweep's row messages, in any completion order.
///
/// Rows are keyed by index, so no arrival order is required; the collector
/// enforces that each of the grid's rows arrives exactly once with the
/// right sweep tag and shape before the sweep may close.
pub struct SweepCollector {
    sweep: SweepId,
    rows: u32,
    received: IndexSet<u32>,
}

impl SweepCollector {
    /// An empty collector for `sweep` over a `rows`-row grid.
    pub fn new(sweep: SweepId, rows: u32) -> Self {
        Self {
            sweep,
            rows,
            received: IndexSet::with_capacity(rows as usize),
        }
    }

    /// Validate one row message and write it into the authoritative grid.
    pub fn accept(&mut self, lattice: &mut Lattice, update: RowUpdate) -> Result<(), ClusterError> {
        if update.sweep != self.sweep {
            return Err(ClusterError::SweepMismatch {
                expected: self.sweep.0,
                got: update.sweep.0,
                from: update.from,
            });
        }
        if update.row >= self.rows {
            return Err(ClusterError::RowOutOfRange {
                row: update.row,
                rows: self.rows,
                from: update.from,
            });
        }
        if update.cells.len() != lattice.size() as usize {
            return Err(ClusterError::RowLength {
                row: update.row,
                expected: lattice.size(),
                got: update.cells.len(),
                from: update.from,
            });
        }
        if !self.received.insert(update.row) {
            return Err(ClusterError::DuplicateRow {
                sweep: self.sweep.0,
                row: update.row,
                from: update.from,
            });
        }
        lattice
            .set_row(update.row, &update.cells)
            .map_err(|_| ClusterError::RowLength {
                row: update.row,
                expected: lattice.size(),
                got: update.cells.len(),
                from: update.from,
            })
    }

    /// Rows received so far.
    pub fn received(&self) -> usize {
        self.received.len()
    }

    /// Whether every row of the grid has arrived.
    pub fn is_complete(&self) -> bool {
        self.received.len() as u32 == self.rows
    }
}

// ── Master ──────────────────────────────────────────────────────

/// The master loop: owns the authoritative grid and the histories, never
/// updates a spin itself.
pub(crate) fn run_master(
    endpoint: &MasterEndpoint,
    ctx: &DistributedContext,
    state: &mut SimState,
) -> Result<(), SimError> {
    let rows = state.lattice().size();
    debug!(
        workers = ctx.worker_count(),
        rows, "distributing cleared grid"
    );
    broadcast_grid(endpoint, 0, state).map_err(abort)?;

    for sweep in 0..state.sweeps() {
        let mut collector = SweepCollector::new(SweepId(sweep), rows);
        while !collector.is_complete() {
            match endpoint.recv().map_err(abort)? {
                Message::Row(update) => {
                    trace!(sweep, row = update.row, from = %update.from, "row received");
                    collector.accept(state.lattice_mut(), update).map_err(abort)?;
                }
                Message::Abort { from, reason } => {
                    return Err(abort(ClusterError::WorkerAborted { rank: from, reason }));
                }
                other => {
                    return Err(abort(ClusterError::UnexpectedMessage { kind: other.kind() }));
                }
            }
        }

        let sample = state.record_sample()?;
        debug!(
            sweep,
            energy = sample.energy,
            magnetism = sample.magnetism,
            "sweep resynchronized"
        );
        broadcast_grid(endpoint, sweep + 1, state).map_err(abort)?;
    }
    Ok(())
}

fn broadcast_grid(
    endpoint: &MasterEndpoint,
    epoch: u64,
    state: &SimState,
) -> Result<(), ClusterError> {
    endpoint.broadcast(&Message::Sync(GridSync {
        epoch,
        spins: state.lattice().spins().to_vec(),
    }))
}

// ── Worker ──────────────────────────────────────────────────────

/// The worker loop: updates its row block against a full replica, streams
/// the rows out, and blocks on the resync barrier.
///
/// The RNG lane equals the worker's rank, so every rank draws from an
/// independent stream of the run seed.
pub(crate) fn run_worker(
    endpoint: &WorkerEndpoint,
    range: RowRange,
    mut replica: Lattice,
    sweeps: u64,
    seed: u64,
) -> Result<(), ClusterError> {
    let rule = Metropolis;
    let mut rng = lane_rng(seed, u64::from(endpoint.rank().0));

    wait_for_sync(endpoint, 0, &mut replica)?;
    for sweep in 0..sweeps {
        let flips = range_sweep(&rule, &mut replica, range, &mut rng);
        trace!(rank = %endpoint.rank(), sweep, flips, "block updated");

        for row in range.rows() {
            endpoint.send(Message::Row(RowUpdate {
                sweep: SweepId(sweep),
                row,
                cells: replica.row(row).to_vec(),
                from: endpoint.rank(),
            }))?;
        }
        wait_for_sync(endpoint, sweep + 1, &mut replica)?;
    }
    Ok(())
}

/// Block until the master's epoch broadcast arrives, then overwrite the
/// whole replica with it.
fn wait_for_sync(
    endpoint: &WorkerEndpoint,
    epoch: u64,
    replica: &mut Lattice,
) -> Result<(), ClusterError> {
    match endpoint.recv()? {
        Message::Sync(sync) => {
            if sync.epoch != epoch {
                return Err(ClusterError::SweepMismatch {
                    expected: epoch,
                    got: sync.epoch,
                    from: Rank::MASTER,
                });
            }
            if sync.spins.len() != replica.cell_count() {
                return Err(ClusterError::GridLength {
                    expected: replica.cell_count(),
                    got: sync.spins.len(),
                });
            }
            replica.spins_mut().copy_from_slice(&sync.spins);
            Ok(())
        }
        other => Err(ClusterError::UnexpectedMessage { kind: other.kind() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curie_core::Spin;
    use curie_engine::SimConfig;
    use curie_lattice::Boundary;

    fn lattice(size: u32) -> Lattice {
        Lattice::new(size, 1.0, Boundary::Periodic).unwrap()
    }

    fn row_update(sweep: u64, row: u32, cells: Vec<Spin>, from: u32) -> RowUpdate {
        RowUpdate {
            sweep: SweepId(sweep),
            row,
            cells,
            from: Rank(from),
        }
    }

    // ── SweepCollector ───────────────────────────────────────

    #[test]
    fn collector_accepts_rows_in_any_order() {
        let mut grid = lattice(4);
        let mut collector = SweepCollector::new(SweepId(0), 4);
        for row in [2u32, 0, 3, 1] {
            collector
                .accept(&mut grid, row_update(0, row, vec![Spin::Down; 4], 1))
                .unwrap();
        }
        assert!(collector.is_complete());
        assert_eq!(grid.magnetism(), -16.0);
    }

    #[test]
    fn collector_rejects_wrong_sweep_tag() {
        let mut grid = lattice(4);
        let mut collector = SweepCollector::new(SweepId(3), 4);
        let err = collector
            .accept(&mut grid, row_update(2, 0, vec![Spin::Up; 4], 1))
            .unwrap_err();
        assert_eq!(
            err,
            ClusterError::SweepMismatch {
                expected: 3,
                got: 2,
                from: Rank(1)
            }
        );
    }

    #[test]
    fn collector_rejects_duplicate_rows() {
        let mut grid = lattice(4);
        let mut collector = SweepCollector::new(SweepId(0), 4);
        collector
            .accept(&mut grid, row_update(0, 1, vec![Spin::Up; 4], 1))
            .unwrap();
        let err = collector
            .accept(&mut grid, row_update(0, 1, vec![Spin::Up; 4], 1))
            .unwrap_err();
        assert_eq!(
            err,
            ClusterError::DuplicateRow {
                sweep: 0,
                row: 1,
                from: Rank(1)
            }
        );
    }

    #[test]
    fn collector_rejects_out_of_range_and_misshapen_rows() {
        let mut grid = lattice(4);
        let mut collector = SweepCollector::new(SweepId(0), 4);
        assert!(matches!(
            collector
                .accept(&mut grid, row_update(0, 9, vec![Spin::Up; 4], 2))
                .unwrap_err(),
            ClusterError::RowOutOfRange { row: 9, .. }
        ));
        assert!(matches!(
            collector
                .accept(&mut grid, row_update(0, 1, vec![Spin::Up; 3], 2))
                .unwrap_err(),
            ClusterError::RowLength { row: 1, got: 3, .. }
        ));
        // Neither failed message counts as received.
        assert_eq!(collector.received(), 0);
    }

    // ── Master against scripted workers ──────────────────────

    #[test]
    fn master_aborts_on_worker_abort_notification() {
        let (master, workers) = crate::transport::connect(1);
        let ctx = DistributedContext::new(4, 1).unwrap();
        let mut state = SimState::new(SimConfig::new("abort", 4, 2, 1.0)).unwrap();

        workers[0].abort("simulated failure");
        let err = run_master(&master, &ctx, &mut state).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("aborted"), "unexpected error: {text}");
        assert!(text.contains("simulated failure"), "unexpected error: {text}");
    }

    #[test]
    fn master_aborts_when_workers_vanish() {
        let (master, workers) = crate::transport::connect(2);
        let ctx = DistributedContext::new(4, 2).unwrap();
        let mut state = SimState::new(SimConfig::new("vanish", 4, 2, 1.0)).unwrap();

        drop(workers);
        // The initial broadcast already fails: the peers are gone.
        let err = run_master(&master, &ctx, &mut state).unwrap_err();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn master_completes_one_sweep_with_a_scripted_worker() {
        let (master, workers) = crate::transport::connect(1);
        let ctx = DistributedContext::new(3, 1).unwrap();
        let mut state = SimState::new(SimConfig::new("scripted", 3, 1, 1.0)).unwrap();

        let handle = std::thread::spawn(move || {
            let worker = &workers[0];
            // Swallow the epoch-0 sync, send back an all-down grid row by
            // row, then swallow the epoch-1 sync.
            let first = worker.recv().unwrap();
            assert!(matches!(first, Message::Sync(GridSync { epoch: 0, .. })));
            for row in 0..3u32 {
                worker
                    .send(Message::Row(row_update(0, row, vec![Spin::Down; 3], 1)))
                    .unwrap();
            }
            match worker.recv().unwrap() {
                Message::Sync(sync) => {
                    assert_eq!(sync.epoch, 1);
                    assert!(sync.spins.iter().all(|&s| s == Spin::Down));
                }
                other => panic!("unexpected {other:?}"),
            }
        });

        run_master(&master, &ctx, &mut state).unwrap();
        handle.join().unwrap();

        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history().magnetism()[0], -9.0);
        assert_eq!(state.lattice().magnetism(), -9.0);
    }

    // ── Worker against a scripted master ─────────────────────

    #[test]
    fn worker_rejects_a_mis_epoched_sync() {
        let (master, workers) = crate::transport::connect(1);
        let replica = lattice(4);

        master
            .send(
                Rank(1),
                Message::Sync(GridSync {
                    epoch: 7,
                    spins: vec![Spin::Up; 16],
                }),
            )
            .unwrap();
        let err = run_worker(
            &workers[0],
            RowRange { start: 0, end: 4 },
            replica,
            1,
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClusterError::SweepMismatch {
                expected: 0,
                got: 7,
                from: Rank::MASTER
            }
        );
    }

    #[test]
    fn worker_rejects_a_misshapen_grid() {
        let (master, workers) = crate::transport::connect(1);
        let replica = lattice(4);

        master
            .send(
                Rank(1),
                Message::Sync(GridSync {
                    epoch: 0,
                    spins: vec![Spin::Up; 5],
                }),
            )
            .unwrap();
        let err = run_worker(
            &workers[0],
            RowRange { start: 0, end: 4 },
            replica,
            1,
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClusterError::GridLength {
                expected: 16,
                got: 5
            }
        );
    }

    #[test]
    fn worker_fails_fast_when_master_vanishes() {
        let (master, workers) = crate::transport::connect(1);
        drop(master);
        let err = run_worker(
            &workers[0],
            RowRange { start: 0, end: 4 },
            lattice(4),
            1,
            0,
        )
        .unwrap_err();
        assert_eq!(err, ClusterError::InboxClosed);
    }
}
