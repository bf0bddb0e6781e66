//! Wire messages for the per-sweep resynchronization protocol.

use curie_core::{Spin, SweepId};

use crate::context::Rank;

/// One updated row, worker → master, tagged by sweep and row index.
///
/// Rows are independent and keyed by index, so the master accepts them in
/// any completion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowUpdate {
    /// The sweep this row belongs to.
    pub sweep: SweepId,
    /// Row index in the full grid.
    pub row: u32,
    /// The row's cells, left to right.
    pub cells: Vec<Spin>,
    /// The sending worker's rank.
    pub from: Rank,
}

/// The authoritative full grid, master → workers.
///
/// `epoch` counts completed sweeps: epoch 0 distributes the cleared grid
/// before the first sweep, epoch `s + 1` ends sweep `s`. A worker
/// overwrites its entire replica with the payload and only then proceeds —
/// this is the per-sweep barrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSync {
    /// Number of sweeps the grid reflects.
    pub epoch: u64,
    /// The full grid in row-major order.
    pub spins: Vec<Spin>,
}

/// A protocol message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Worker → master: one updated row.
    Row(RowUpdate),
    /// Master → workers: full-grid resynchronization.
    Sync(GridSync),
    /// Worker → master: fatal failure notification. The run aborts; there
    /// is no recovery path.
    Abort {
        /// The failing worker's rank.
        from: Rank,
        /// Description of the failure.
        reason: String,
    },
}

impl Message {
    /// Message kind for error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Row(_) => "row update",
            Message::Sync(_) => "grid sync",
            Message::Abort { .. } => "abort",
        }
    }
}
