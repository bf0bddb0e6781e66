//! The distributed execution strategy.

use std::thread;

use curie_core::WorkerId;
use curie_engine::{SimError, SimState, Strategy};
use tracing::debug;

use crate::context::DistributedContext;
use crate::coordinator::{abort, run_master, run_worker};
use crate::error::ClusterError;
use crate::transport::{connect, WorkerEndpoint};

/// Notifies the master if the worker terminates without reporting.
///
/// Dropped while still armed — a panic inside the worker loop — it sends
/// the abort notification so the master never blocks on rows that will
/// not arrive.
struct AbortOnDrop<'a> {
    endpoint: &'a WorkerEndpoint,
    armed: bool,
}

impl Drop for AbortOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.endpoint.abort("worker terminated abnormally");
        }
    }
}

/// The distributed strategy: a master rank plus worker ranks over a
/// blocking channel star, resynchronizing the full grid every sweep.
///
/// Ranks are OS threads for the run's duration; the calling thread is the
/// master. All lattice data moves through messages — no rank ever reads
/// another rank's memory.
#[derive(Clone, Copy, Debug)]
pub struct Distributed {
    workers: usize,
}

impl Distributed {
    /// A strategy with the given worker rank count. The configuration is
    /// validated against the grid at run time: zero workers, or more
    /// workers than rows, aborts the run before any rank starts.
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Configured worker rank count.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Strategy for Distributed {
    fn name(&self) -> &str {
        "distributed"
    }

    fn simulate(&self, state: &mut SimState) -> Result<(), SimError> {
        let ctx = DistributedContext::new(state.lattice().size(), self.workers).map_err(abort)?;
        let (master_endpoint, worker_endpoints) = connect(ctx.worker_count());
        let sweeps = state.sweeps();
        let seed = state.seed();
        debug!(
            workers = ctx.worker_count(),
            sweeps, "starting distributed run"
        );

        thread::scope(|s| {
            let mut handles = Vec::with_capacity(ctx.worker_count());
            for (w, endpoint) in worker_endpoints.into_iter().enumerate() {
                let range = ctx.partition().range(WorkerId(w as u32));
                let replica = state.lattice().clone();
                handles.push(s.spawn(move || {
                    let mut guard = AbortOnDrop {
                        endpoint: &endpoint,
                        armed: true,
                    };
                    let outcome = run_worker(&endpoint, range, replica, sweeps, seed);
                    guard.armed = false;
                    drop(guard);
                    if let Err(e) = &outcome {
                        endpoint.abort(&e.to_string());
                    }
                    outcome
                }));
            }

            let master_result = run_master(&master_endpoint, &ctx, state);
            // Closing the master's endpoint unblocks any worker still
            // waiting on a sync, so the joins below cannot hang.
            drop(master_endpoint);

            let mut worker_error: Option<ClusterError> = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        worker_error.get_or_insert(e);
                    }
                    Err(_) => {
                        worker_error.get_or_insert(ClusterError::WorkerPanicked);
                    }
                }
            }

            match (master_result, worker_error) {
                (Err(e), _) => Err(e),
                (Ok(()), Some(e)) => Err(abort(e)),
                (Ok(()), None) => Ok(()),
            }
        })
    }
}
