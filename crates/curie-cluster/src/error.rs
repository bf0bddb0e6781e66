//! Error types for the distributed protocol.

use std::fmt;

use crate::context::Rank;

/// Fatal distributed-protocol errors.
///
/// Every variant aborts the run — the protocol has no recovery path, no
/// retries, and no timeouts. Validation variants (`SweepMismatch`,
/// `DuplicateRow`, ...) exist so a protocol bug dies loudly at the first
/// inconsistent message instead of silently corrupting the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterError {
    /// The grid has no rows to partition.
    NoRows,
    /// The run was configured with zero workers.
    NoWorkers,
    /// More workers than lattice rows: some workers would own nothing.
    TooManyWorkers {
        /// Requested worker count.
        workers: usize,
        /// Available row count.
        rows: u32,
    },
    /// A blocking send found the peer gone.
    Disconnected {
        /// The vanished peer.
        rank: Rank,
    },
    /// A blocking receive found every peer gone.
    InboxClosed,
    /// A message carried the wrong sweep tag.
    SweepMismatch {
        /// The sweep the receiver is in.
        expected: u64,
        /// The sweep the message was tagged with.
        got: u64,
        /// The sender.
        from: Rank,
    },
    /// The same row arrived twice within one sweep.
    DuplicateRow {
        /// The sweep in progress.
        sweep: u64,
        /// The repeated row index.
        row: u32,
        /// The sender.
        from: Rank,
    },
    /// A row index beyond the grid arrived.
    RowOutOfRange {
        /// The offending row index.
        row: u32,
        /// The grid's row count.
        rows: u32,
        /// The sender.
        from: Rank,
    },
    /// A row message carried the wrong number of cells.
    RowLength {
        /// The row index.
        row: u32,
        /// Expected cell count (the grid size).
        expected: u32,
        /// Cells actually carried.
        got: usize,
        /// The sender.
        from: Rank,
    },
    /// A grid broadcast carried the wrong number of cells.
    GridLength {
        /// Expected cell count (`size²`).
        expected: usize,
        /// Cells actually carried.
        got: usize,
    },
    /// A message of the wrong kind arrived for the current protocol step.
    UnexpectedMessage {
        /// The kind that arrived.
        kind: &'static str,
    },
    /// A worker reported a fatal error and stopped.
    WorkerAborted {
        /// The aborting worker's rank.
        rank: Rank,
        /// The worker's error description.
        reason: String,
    },
    /// A worker thread terminated without reporting a result.
    WorkerPanicked,
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows => write!(f, "no rows to partition"),
            Self::NoWorkers => write!(f, "distributed run needs at least one worker"),
            Self::TooManyWorkers { workers, rows } => {
                write!(f, "{workers} workers for {rows} rows: every worker must own at least one row")
            }
            Self::Disconnected { rank } => write!(f, "rank {rank} is gone"),
            Self::InboxClosed => write!(f, "all peers are gone"),
            Self::SweepMismatch { expected, got, from } => {
                write!(f, "rank {from} sent sweep {got} data during sweep {expected}")
            }
            Self::DuplicateRow { sweep, row, from } => {
                write!(f, "rank {from} sent row {row} twice in sweep {sweep}")
            }
            Self::RowOutOfRange { row, rows, from } => {
                write!(f, "rank {from} sent row {row}, grid has {rows} rows")
            }
            Self::RowLength {
                row,
                expected,
                got,
                from,
            } => write!(
                f,
                "rank {from} sent row {row} with {got} cells, expected {expected}"
            ),
            Self::GridLength { expected, got } => {
                write!(f, "grid broadcast carried {got} cells, expected {expected}")
            }
            Self::UnexpectedMessage { kind } => {
                write!(f, "unexpected {kind} message for this protocol step")
            }
            Self::WorkerAborted { rank, reason } => {
                write!(f, "worker rank {rank} aborted: {reason}")
            }
            Self::WorkerPanicked => write!(f, "a worker thread terminated abnormally"),
        }
    }
}

impl std::error::Error for ClusterError {}
