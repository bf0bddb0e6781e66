//! Explicit distributed-run context.

use std::fmt;

use curie_core::partition::{PartitionError, RowPartition, RowRange};
use curie_core::WorkerId;

use crate::error::ClusterError;

// ── Rank ────────────────────────────────────────────────────────

/// A participant's rank: 0 is the master, workers are `1..world_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl Rank {
    /// The master rank.
    pub const MASTER: Rank = Rank(0);

    /// Whether this is the master rank.
    pub fn is_master(self) -> bool {
        self == Self::MASTER
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── DistributedContext ──────────────────────────────────────────

/// Static description of one distributed run: the worker count and the
/// row partition.
///
/// Constructed once and passed into the coordinator explicitly — rank and
/// world-size never live in ambient globals. The rank count is fixed for
/// the run's entire duration; there is no support for a worker joining or
/// leaving mid-run.
#[derive(Clone, Debug)]
pub struct DistributedContext {
    partition: RowPartition,
}

impl DistributedContext {
    /// Build the context for `workers` workers over a `rows`-row grid.
    ///
    /// The partition is balanced: every row is owned by exactly one worker
    /// whether or not `rows` divides evenly, and configurations where a
    /// worker would own nothing are rejected.
    pub fn new(rows: u32, workers: usize) -> Result<Self, ClusterError> {
        let partition = RowPartition::build(rows, workers).map_err(|e| match e {
            PartitionError::NoRows => ClusterError::NoRows,
            PartitionError::NoWorkers => ClusterError::NoWorkers,
            PartitionError::TooManyWorkers { workers, rows } => {
                ClusterError::TooManyWorkers { workers, rows }
            }
        })?;
        Ok(Self { partition })
    }

    /// Total participant count: the master plus the workers.
    pub fn world_size(&self) -> usize {
        self.partition.worker_count() + 1
    }

    /// Number of worker ranks.
    pub fn worker_count(&self) -> usize {
        self.partition.worker_count()
    }

    /// The row partition, one contiguous disjoint block per worker.
    pub fn partition(&self) -> &RowPartition {
        &self.partition
    }

    /// The rank carrying `worker`.
    pub fn rank_of(&self, worker: WorkerId) -> Rank {
        Rank(worker.0 + 1)
    }

    /// The worker carried by `rank`, or `None` for the master or an
    /// out-of-world rank.
    pub fn worker_of(&self, rank: Rank) -> Option<WorkerId> {
        if rank.is_master() || rank.0 as usize >= self.world_size() {
            return None;
        }
        Some(WorkerId(rank.0 - 1))
    }

    /// The row block owned by `rank`'s worker, or `None` for the master.
    pub fn range_of(&self, rank: Rank) -> Option<RowRange> {
        self.worker_of(rank).map(|w| self.partition.range(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_is_rank_zero() {
        assert!(Rank::MASTER.is_master());
        assert!(!Rank(1).is_master());
    }

    #[test]
    fn ranks_and_workers_map_both_ways() {
        let ctx = DistributedContext::new(10, 3).unwrap();
        assert_eq!(ctx.world_size(), 4);
        assert_eq!(ctx.rank_of(WorkerId(0)), Rank(1));
        assert_eq!(ctx.worker_of(Rank(3)), Some(WorkerId(2)));
        assert_eq!(ctx.worker_of(Rank::MASTER), None);
        assert_eq!(ctx.worker_of(Rank(4)), None);
    }

    #[test]
    fn master_owns_no_rows() {
        let ctx = DistributedContext::new(10, 3).unwrap();
        assert_eq!(ctx.range_of(Rank::MASTER), None);
        let r1 = ctx.range_of(Rank(1)).unwrap();
        assert_eq!((r1.start, r1.end), (0, 4));
    }

    #[test]
    fn rejects_unworkable_configurations() {
        assert_eq!(
            DistributedContext::new(10, 0).unwrap_err(),
            ClusterError::NoWorkers
        );
        assert_eq!(
            DistributedContext::new(2, 3).unwrap_err(),
            ClusterError::TooManyWorkers { workers: 3, rows: 2 }
        );
        assert_eq!(
            DistributedContext::new(0, 1).unwrap_err(),
            ClusterError::NoRows
        );
    }
}
