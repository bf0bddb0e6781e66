//! Dense spin grid with in-place mutation.

use curie_core::Spin;
use rand::{Rng, RngExt};
use smallvec::SmallVec;
use std::fmt;

use crate::boundary::Boundary;

// ── LatticeError ────────────────────────────────────────────────

/// Errors from lattice construction and row replacement.
#[derive(Clone, Debug, PartialEq)]
pub enum LatticeError {
    /// Grid dimension is zero.
    EmptyLattice,
    /// Grid dimension exceeds [`Lattice::MAX_SIZE`].
    DimensionTooLarge {
        /// The rejected size.
        size: u32,
        /// The maximum accepted size.
        max: u32,
    },
    /// Temperature is negative, NaN, or infinite.
    InvalidTemperature {
        /// The rejected value.
        value: f64,
    },
    /// A replacement row has the wrong number of cells.
    RowLengthMismatch {
        /// Expected cell count (`size`).
        expected: u32,
        /// Actual cell count supplied.
        got: usize,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLattice => write!(f, "lattice size must be positive"),
            Self::DimensionTooLarge { size, max } => {
                write!(f, "lattice size {size} exceeds maximum {max}")
            }
            Self::InvalidTemperature { value } => {
                write!(f, "temperature must be finite and >= 0, got {value}")
            }
            Self::RowLengthMismatch { expected, got } => {
                write!(f, "row has {got} cells, lattice rows have {expected}")
            }
        }
    }
}

impl std::error::Error for LatticeError {}

// ── free helpers ────────────────────────────────────────────────

/// Sum of the nearest-neighbor spin values of `(row, col)` read from a raw
/// row-major grid slice under the given boundary convention.
///
/// Shared by [`Lattice::neighbour_sum`] and the buffer-level sweep kernels
/// (frozen-view checkerboard passes, device dispatches) that operate on
/// grids outside a `Lattice`.
#[inline]
pub fn neighbour_sum_of(spins: &[Spin], size: u32, boundary: Boundary, row: u32, col: u32) -> i32 {
    let offsets: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    let mut sum = 0i32;
    for (dr, dc) in offsets {
        let nr = boundary.resolve(i64::from(row) + dr, size);
        let nc = boundary.resolve(i64::from(col) + dc, size);
        if let (Some(nr), Some(nc)) = (nr, nc) {
            sum += i32::from(spins[nr as usize * size as usize + nc as usize].value());
        }
    }
    sum
}

// ── Lattice ─────────────────────────────────────────────────────

/// The 2D Ising lattice: a dense row-major `size × size` grid of [`Spin`]s,
/// the temperature, and the boundary convention for neighbor lookup.
///
/// Spins are mutated in place by the update rule; every value is ±1 at all
/// times outside an update (the [`Spin`] type makes anything else
/// unrepresentable). Construction starts from the fully aligned (all-up)
/// state; [`randomize`](Lattice::randomize) produces the random quench.
///
/// # Energy convention
///
/// [`energy()`](Lattice::energy) counts each unordered nearest-neighbor
/// bond exactly once (the right and down bonds of every site, wrapping
/// under [`Boundary::Periodic`]). An aligned periodic `N × N` grid has
/// energy `-2N²`.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    size: u32,
    spins: Vec<Spin>,
    temperature: f64,
    boundary: Boundary,
}

impl Lattice {
    /// Maximum edge length. Keeps `size * size` cell indexing comfortably
    /// inside `u32` row/column arithmetic.
    pub const MAX_SIZE: u32 = 1 << 15;

    /// Create an aligned (all-up) lattice.
    ///
    /// # Examples
    ///
    /// ```
    /// use curie_lattice::{Boundary, Lattice};
    ///
    /// let lattice = Lattice::new(16, 2.0, Boundary::Periodic).unwrap();
    /// assert_eq!(lattice.cell_count(), 256);
    /// assert_eq!(lattice.magnetism(), 256.0);
    /// assert_eq!(lattice.energy(), -512.0);
    /// ```
    pub fn new(size: u32, temperature: f64, boundary: Boundary) -> Result<Self, LatticeError> {
        if size == 0 {
            return Err(LatticeError::EmptyLattice);
        }
        if size > Self::MAX_SIZE {
            return Err(LatticeError::DimensionTooLarge {
                size,
                max: Self::MAX_SIZE,
            });
        }
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(LatticeError::InvalidTemperature { value: temperature });
        }
        Ok(Self {
            size,
            spins: vec![Spin::Up; size as usize * size as usize],
            temperature,
            boundary,
        })
    }

    /// Edge length of the grid.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of sites (`size²`).
    pub fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// Temperature in reduced units.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// The boundary convention for neighbor lookup.
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Row-major flat index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.size as usize + col as usize
    }

    /// The spin at `(row, col)`.
    #[inline]
    pub fn spin(&self, row: u32, col: u32) -> Spin {
        self.spins[self.index(row, col)]
    }

    /// Overwrite the spin at `(row, col)`.
    #[inline]
    pub fn set_spin(&mut self, row: u32, col: u32, spin: Spin) {
        let i = self.index(row, col);
        self.spins[i] = spin;
    }

    /// The full grid in row-major order.
    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Mutable access to the full grid in row-major order.
    ///
    /// Used by the strategies that stage updates outside the lattice
    /// (frozen-view passes, device buffers, replica resync) and write whole
    /// regions back.
    pub fn spins_mut(&mut self) -> &mut [Spin] {
        &mut self.spins
    }

    /// One row of the grid.
    pub fn row(&self, row: u32) -> &[Spin] {
        let start = row as usize * self.size as usize;
        &self.spins[start..start + self.size as usize]
    }

    /// Replace one row of the grid.
    pub fn set_row(&mut self, row: u32, cells: &[Spin]) -> Result<(), LatticeError> {
        if cells.len() != self.size as usize {
            return Err(LatticeError::RowLengthMismatch {
                expected: self.size,
                got: cells.len(),
            });
        }
        let start = row as usize * self.size as usize;
        self.spins[start..start + self.size as usize].copy_from_slice(cells);
        Ok(())
    }

    /// Assign every spin independently and uniformly to ±1.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        for spin in &mut self.spins {
            *spin = if rng.random::<bool>() { Spin::Up } else { Spin::Down };
        }
    }

    /// The nearest neighbors of `(row, col)` under the boundary convention.
    ///
    /// Four coordinates under `Periodic`; two or three at `Open` edges.
    pub fn neighbours(&self, row: u32, col: u32) -> SmallVec<[(u32, u32); 4]> {
        let offsets: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let mut out = SmallVec::new();
        for (dr, dc) in offsets {
            let nr = self.boundary.resolve(i64::from(row) + dr, self.size);
            let nc = self.boundary.resolve(i64::from(col) + dc, self.size);
            if let (Some(nr), Some(nc)) = (nr, nc) {
                out.push((nr, nc));
            }
        }
        out
    }

    /// Sum of the nearest-neighbor spin values of `(row, col)`.
    #[inline]
    pub fn neighbour_sum(&self, row: u32, col: u32) -> i32 {
        neighbour_sum_of(&self.spins, self.size, self.boundary, row, col)
    }

    /// Total bond energy: `-Σ s_i s_j` over all nearest-neighbor bonds,
    /// each unordered bond counted once.
    pub fn energy(&self) -> f64 {
        let mut energy = 0i64;
        for row in 0..self.size {
            for col in 0..self.size {
                let s = i64::from(self.spin(row, col).value());
                if let Some(nc) = self.boundary.resolve(i64::from(col) + 1, self.size) {
                    energy -= s * i64::from(self.spin(row, nc).value());
                }
                if let Some(nr) = self.boundary.resolve(i64::from(row) + 1, self.size) {
                    energy -= s * i64::from(self.spin(nr, col).value());
                }
            }
        }
        energy as f64
    }

    /// Net magnetization: the sum of all spin values, in `[-size², size²]`.
    pub fn magnetism(&self) -> f64 {
        let sum: i64 = self.spins.iter().map(|s| i64::from(s.value())).sum();
        sum as f64
    }
}
