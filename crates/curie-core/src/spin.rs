//! The binary spin value type.

use std::fmt;
use std::ops::Neg;

/// A single Ising spin: up (+1) or down (-1).
///
/// Represented as one byte with the numeric value as the discriminant, so
/// the ±1 invariant is unrepresentable-by-construction rather than checked
/// at every site read. Grids store spins densely as `Vec<Spin>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Spin {
    /// Spin up, numeric value +1.
    Up = 1,
    /// Spin down, numeric value -1.
    Down = -1,
}

impl Spin {
    /// Numeric value: +1 for [`Spin::Up`], -1 for [`Spin::Down`].
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }

    /// The opposite spin.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Spin::Up => Spin::Down,
            Spin::Down => Spin::Up,
        }
    }

    /// Decode from a stored byte: `1` → up, `-1` → down, anything else `None`.
    pub fn from_i8(v: i8) -> Option<Self> {
        match v {
            1 => Some(Spin::Up),
            -1 => Some(Spin::Down),
            _ => None,
        }
    }
}

impl Neg for Spin {
    type Output = Spin;

    fn neg(self) -> Spin {
        self.flipped()
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::Up => write!(f, "+1"),
            Spin::Down => write!(f, "-1"),
        }
    }
}
