//! Explicit rounding direction.

use serde::{Deserialize, Serialize};

/// Direction used whenever a value is truncated.
///
/// Pay-side amounts round [`Rounding::Up`], receive-side amounts round
/// [`Rounding::Down`]. The type has no `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Toward positive infinity (ceiling).
    Up,
    /// Toward negative infinity (floor).
    Down,
}

impl Rounding {
    /// Maps the `roundUp` flag used by on-chain tooling onto a direction.
    #[must_use]
    pub const fn from_round_up(round_up: bool) -> Self {
        if round_up {
            Self::Up
        } else {
            Self::Down
        }
    }

    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }

    /// The opposite direction.
    ///
    /// Used where a value sits in a denominator: rounding the divisor down
    /// rounds the quotient up.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}
