//! Liquidity ↔ token conversion at a fixed square-root price.
//!
//! Both legs of the constant-liquidity curve:
//!
//! ```text
//! x = L / √P        y = L · √P
//! ```
//!
//! The decimal variants take √P as an [`ExactDecimal`]; the `_q96` variants
//! take the on-chain `√P × 2^96` integer encoding ([`SqrtPriceQ96`]).
//!
//! None of these functions pick a rounding direction. Tokens the trader
//! pays round [`Rounding::Up`]; tokens the trader receives round
//! [`Rounding::Down`].

use alloy::primitives::U256;
use num_bigint::BigInt;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::config::Q96_RESOLUTION;
use crate::decimal::ExactDecimal;
use crate::error::Result;
use crate::rounding::Rounding;

/// `2^96` as an exact decimal.
pub fn q96() -> ExactDecimal {
    ExactDecimal::integer(BigInt::one() << Q96_RESOLUTION)
}

/// √price scaled by `2^96`, as stored on-chain (`uint160`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SqrtPriceQ96(pub U256);

impl SqrtPriceQ96 {
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub const fn get(self) -> U256 {
        self.0
    }

    pub fn as_decimal(self) -> ExactDecimal {
        ExactDecimal::from(self.0)
    }

    /// Encodes a decimal √price, truncating below `2^-96` in the given
    /// direction. `None` if the result is negative or overflows `U256`.
    pub fn from_sqrt_price(sqrt_price: &ExactDecimal, rounding: Rounding) -> Option<Self> {
        (sqrt_price * &q96()).round(rounding).to_u256().map(Self)
    }
}

/// `L / √P`, rounded to an integer amount of token X.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) when
/// `sqrt_price` is zero.
pub fn liquidity_to_x(
    liquidity: &ExactDecimal,
    sqrt_price: &ExactDecimal,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    liquidity.div_rounded(sqrt_price, rounding)
}

/// `L · √P`, rounded to an integer amount of token Y.
pub fn liquidity_to_y(
    liquidity: &ExactDecimal,
    sqrt_price: &ExactDecimal,
    rounding: Rounding,
) -> ExactDecimal {
    (liquidity * sqrt_price).round(rounding)
}

/// `x · √P`: the liquidity backing an amount of token X.
pub fn x_to_liquidity(
    amount_x: &ExactDecimal,
    sqrt_price: &ExactDecimal,
    rounding: Rounding,
) -> ExactDecimal {
    (amount_x * sqrt_price).round(rounding)
}

/// `y / √P`: the liquidity backing an amount of token Y.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) when
/// `sqrt_price` is zero.
pub fn y_to_liquidity(
    amount_y: &ExactDecimal,
    sqrt_price: &ExactDecimal,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    amount_y.div_rounded(sqrt_price, rounding)
}

/// `L · 2^96 / sqrtPriceX96`.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) when the
/// encoded price is zero.
pub fn liquidity_to_x_q96(
    liquidity: &ExactDecimal,
    sqrt_price: SqrtPriceQ96,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    (liquidity * &q96()).div_rounded(&sqrt_price.as_decimal(), rounding)
}

/// `L · sqrtPriceX96 / 2^96`.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) if the fixed
/// point divisor is zero, which `2^96` never is.
pub fn liquidity_to_y_q96(
    liquidity: &ExactDecimal,
    sqrt_price: SqrtPriceQ96,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    (liquidity * &sqrt_price.as_decimal()).div_rounded(&q96(), rounding)
}

/// `x · sqrtPriceX96 / 2^96`.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) if the fixed
/// point divisor is zero, which `2^96` never is.
pub fn x_to_liquidity_q96(
    amount_x: &ExactDecimal,
    sqrt_price: SqrtPriceQ96,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    (amount_x * &sqrt_price.as_decimal()).div_rounded(&q96(), rounding)
}

/// `y · 2^96 / sqrtPriceX96`.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) when the
/// encoded price is zero.
pub fn y_to_liquidity_q96(
    amount_y: &ExactDecimal,
    sqrt_price: SqrtPriceQ96,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    (amount_y * &q96()).div_rounded(&sqrt_price.as_decimal(), rounding)
}
