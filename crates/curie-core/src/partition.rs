//! Balanced row decomposition across workers.
//!
//! Both the shared-memory and distributed strategies split the lattice into
//! contiguous row blocks, one per worker. The assignment is balanced: with
//! `rows = q * workers + r`, the first `r` workers own `q + 1` rows and the
//! rest own `q`, so every row belongs to exactly one worker for every
//! accepted `(rows, workers)` pair — divisible or not.

use std::fmt;

use crate::id::WorkerId;

// ── RowRange ────────────────────────────────────────────────────

/// A contiguous half-open range of rows `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// First owned row.
    pub start: u32,
    /// One past the last owned row.
    pub end: u32,
}

impl RowRange {
    /// Number of rows in the range.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the range owns no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `row` falls inside the range.
    pub fn contains(&self, row: u32) -> bool {
        self.start <= row && row < self.end
    }

    /// Iterate the owned row indices in order.
    pub fn rows(&self) -> impl Iterator<Item = u32> {
        self.start..self.end
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ── PartitionError ──────────────────────────────────────────────

/// Errors from partition construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// No rows to assign.
    NoRows,
    /// No workers to assign rows to.
    NoWorkers,
    /// More workers than rows: some workers would own nothing.
    TooManyWorkers {
        /// Requested worker count.
        workers: usize,
        /// Available row count.
        rows: u32,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows => write!(f, "no rows to partition"),
            Self::NoWorkers => write!(f, "no workers to partition rows across"),
            Self::TooManyWorkers { workers, rows } => {
                write!(f, "{workers} workers for {rows} rows: every worker must own at least one row")
            }
        }
    }
}

impl std::error::Error for PartitionError {}

// ── RowPartition ────────────────────────────────────────────────

/// Balanced assignment of `rows` contiguous rows across `workers` workers.
///
/// # Examples
///
/// ```
/// use curie_core::partition::RowPartition;
///
/// // 10 rows over 3 workers: 4 + 3 + 3, no row dropped.
/// let p = RowPartition::build(10, 3).unwrap();
/// let lens: Vec<u32> = p.ranges().iter().map(|r| r.len()).collect();
/// assert_eq!(lens, vec![4, 3, 3]);
/// assert_eq!(p.ranges().iter().map(|r| r.len()).sum::<u32>(), 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPartition {
    ranges: Vec<RowRange>,
    rows: u32,
}

impl RowPartition {
    /// Build a balanced partition of `rows` rows across `workers` workers.
    ///
    /// Rejects empty inputs and `workers > rows` (a worker owning zero rows
    /// would silently drop coverage guarantees rather than surface them).
    pub fn build(rows: u32, workers: usize) -> Result<Self, PartitionError> {
        if rows == 0 {
            return Err(PartitionError::NoRows);
        }
        if workers == 0 {
            return Err(PartitionError::NoWorkers);
        }
        if workers as u64 > rows as u64 {
            return Err(PartitionError::TooManyWorkers { workers, rows });
        }

        let base = rows / workers as u32;
        let extra = rows % workers as u32;

        let mut ranges = Vec::with_capacity(workers);
        let mut start = 0u32;
        for w in 0..workers as u32 {
            let len = if w < extra { base + 1 } else { base };
            ranges.push(RowRange {
                start,
                end: start + len,
            });
            start += len;
        }

        Ok(Self { ranges, rows })
    }

    /// Total row count covered by the partition.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of workers.
    pub fn worker_count(&self) -> usize {
        self.ranges.len()
    }

    /// All ranges, in worker order.
    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    /// The range owned by `worker`. Workers are numbered `0..worker_count`.
    pub fn range(&self, worker: WorkerId) -> RowRange {
        self.ranges[worker.0 as usize]
    }

    /// The worker owning `row`, or `None` if `row` is out of range.
    pub fn owner_of(&self, row: u32) -> Option<WorkerId> {
        if row >= self.rows {
            return None;
        }
        self.ranges
            .iter()
            .position(|r| r.contains(row))
            .map(|w| WorkerId(w as u32))
    }

    /// Split a row-major slice into one exclusive block per worker.
    ///
    /// `data.len()` must equal `rows * cols`; the returned blocks cover the
    /// slice exactly, in worker order. This is how the shared-memory
    /// strategy hands each thread its own rows while the borrow checker
    /// proves the blocks are disjoint.
    pub fn split_rows_mut<'a, T>(&self, cols: usize, data: &'a mut [T]) -> Vec<&'a mut [T]> {
        debug_assert_eq!(data.len(), self.rows as usize * cols);
        let mut blocks = Vec::with_capacity(self.ranges.len());
        let mut rest = data;
        for range in &self.ranges {
            let (block, tail) = rest.split_at_mut(range.len() as usize * cols);
            blocks.push(block);
            rest = tail;
        }
        blocks
    }
}
