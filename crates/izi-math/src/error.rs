//! Error taxonomy for the arithmetic layer.

use thiserror::Error;

/// Errors raised by `izi-math` operations.
///
/// Every variant is unrecoverable at the call site: callers get no partial
/// result and no substituted default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// A division had a zero denominator.
    #[error("division by zero")]
    DivideByZero,

    /// A range function was given `pr < pl`.
    #[error("invalid range: right point {pr} is below left point {pl}")]
    InvalidRange { pl: i32, pr: i32 },

    /// Fee tier at or above the 1_000_000 ppm denominator.
    #[error("fee tier {0} ppm must be below 1000000")]
    InvalidFeeTier(u32),

    /// Charge percent above 100.
    #[error("charge percent {0} exceeds 100")]
    InvalidChargePercent(u32),

    /// Price grid rate that is zero or negative.
    #[error("price grid rate must be positive, got {0}")]
    InvalidRate(String),

    /// Square root of a negative value.
    #[error("square root of negative value {0}")]
    NegativeSqrt(String),

    /// Text that is not a decimal or `0x` hex number.
    #[error("failed to parse decimal from {0:?}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, MathError>;
