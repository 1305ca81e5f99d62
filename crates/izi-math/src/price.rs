//! Point → price model.
//!
//! The price at point `p` is `rate^p`. With a decimal rate `m / 10^s` this is
//! the exact rational `m^p / 10^(s·p)` for `p ≥ 0` and `10^(s·|p|) / m^|p|`
//! for negative points, so [`GridPrice`] keeps a numerator/denominator pair
//! and never rounds. Only the square root is truncated, to the grid's
//! precision, in a caller-chosen direction. Inside the crate, even points
//! keep an exact rational root instead (`sqrt(rate^2k) = rate^k`).

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::decimal::{pow10, round_quotient, sqrt_of_ratio, ExactDecimal};
use crate::error::{MathError, Result};
use crate::fraction::Fraction;
use crate::rounding::Rounding;

/// Exact price `numerator / denominator` at one grid point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPrice {
    numerator: BigInt,
    denominator: BigInt,
}

impl GridPrice {
    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// The price truncated to `scale` decimal places.
    ///
    /// Prices at non-negative points are finite decimals and come back exact
    /// once `scale` covers their digits.
    pub fn to_decimal(&self, scale: u32, rounding: Rounding) -> ExactDecimal {
        ExactDecimal::new(
            round_quotient(&(&self.numerator * pow10(scale)), &self.denominator, rounding),
            scale,
        )
    }

    /// `sqrt(price)` truncated to `scale` decimal places.
    pub fn sqrt(&self, scale: u32, rounding: Rounding) -> Result<ExactDecimal> {
        sqrt_of_ratio(&self.numerator, &self.denominator, scale, rounding)
    }

    fn to_fraction(&self) -> Result<Fraction> {
        Fraction::new(self.numerator.clone(), self.denominator.clone())
    }

    /// `sqrt(price)`, exact when the price is a square of a rational,
    /// otherwise truncated to `scale` places.
    pub(crate) fn sqrt_fraction(&self, scale: u32, rounding: Rounding) -> Result<Fraction> {
        self.to_fraction()?.sqrt(scale, rounding)
    }

    /// `sqrt(1 / price)`, with the same exactness rule as
    /// [`Self::sqrt_fraction`].
    pub(crate) fn inverse_sqrt_fraction(
        &self,
        scale: u32,
        rounding: Rounding,
    ) -> Result<Fraction> {
        self.to_fraction()?.recip()?.sqrt(scale, rounding)
    }

    /// Advances to the next point by multiplying once by `rate`.
    ///
    /// Factors already present on the other side cancel instead of
    /// multiplying in, so walking up from a negative point shrinks the
    /// reciprocal power rather than growing both halves.
    pub fn step(&mut self, rate: &ExactDecimal) {
        let mantissa = rate.mantissa();
        let shift = pow10(rate.scale());
        if (&self.denominator % mantissa).is_zero() {
            self.denominator /= mantissa;
        } else {
            self.numerator *= mantissa;
        }
        if (&self.numerator % &shift).is_zero() {
            self.numerator /= &shift;
        } else {
            self.denominator *= shift;
        }
    }
}

/// The discrete price grid: a per-point rate plus the working precision for
/// square-root prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceGrid {
    rate: ExactDecimal,
    precision: u32,
}

impl PriceGrid {
    /// # Errors
    /// [`MathError::InvalidRate`] when `rate <= 0`.
    pub fn new(rate: ExactDecimal, precision: u32) -> Result<Self> {
        if rate <= ExactDecimal::zero() {
            return Err(MathError::InvalidRate(rate.to_string()));
        }
        Ok(Self { rate, precision })
    }

    pub fn rate(&self) -> &ExactDecimal {
        &self.rate
    }

    /// Decimal places kept for square-root prices.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Exact `rate^point`; negative points yield the reciprocal power.
    pub fn price_at(&self, point: i32) -> GridPrice {
        let exp = point.unsigned_abs();
        let powered = self.rate.mantissa().pow(exp);
        let decimal_shift = pow10(self.rate.scale() * exp);
        if point >= 0 {
            GridPrice {
                numerator: powered,
                denominator: decimal_shift,
            }
        } else {
            GridPrice {
                numerator: decimal_shift,
                denominator: powered,
            }
        }
    }

    /// `sqrt(rate^point)` truncated to the grid precision.
    pub fn sqrt_price_at(&self, point: i32, rounding: Rounding) -> Result<ExactDecimal> {
        self.price_at(point).sqrt(self.precision, rounding)
    }

    /// `sqrt(rate^point)` kept exact at even points; odd points are
    /// truncated to the grid precision.
    pub(crate) fn sqrt_price_fraction_at(
        &self,
        point: i32,
        rounding: Rounding,
    ) -> Result<Fraction> {
        self.price_at(point).sqrt_fraction(self.precision, rounding)
    }

    /// Price at the origin point.
    pub fn unit_price() -> GridPrice {
        GridPrice {
            numerator: BigInt::one(),
            denominator: BigInt::one(),
        }
    }
}
