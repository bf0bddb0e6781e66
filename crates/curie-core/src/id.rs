//! Strongly-typed identifiers.

use std::fmt;

/// Monotonically increasing sweep counter.
///
/// One sweep is a full pass attempting to update every lattice site once.
/// `SweepId(n)` tags data belonging to the n-th sweep (0-based); the
/// distributed protocol uses it to detect cross-sweep message mixups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SweepId(pub u64);

impl fmt::Display for SweepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SweepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies one worker within a partitioned run.
///
/// Workers are numbered `0..worker_count` and own the row ranges assigned
/// by a [`RowPartition`](crate::partition::RowPartition) in the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
