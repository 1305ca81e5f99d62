//! Exact rationals for per-point terms.
//!
//! Square-root prices at even points are exact rationals with no finite
//! decimal form when the point is negative (`sqrt(1.0001^-2) = 1 / 1.0001`).
//! Range sums and quotes carry them as fractions and round once, so integer
//! results stay integer in both directions.

use std::fmt;
use std::ops::{Add, Mul};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::decimal::{exact_isqrt, pow10, round_quotient, sqrt_of_ratio, ExactDecimal};
use crate::error::{MathError, Result};
use crate::rounding::Rounding;

/// `numerator / denominator` in lowest terms, denominator positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// # Errors
    /// [`MathError::DivideByZero`] when `denominator` is zero.
    pub(crate) fn new(numerator: BigInt, denominator: BigInt) -> Result<Self> {
        if denominator.is_zero() {
            return Err(MathError::DivideByZero);
        }
        if denominator.is_negative() {
            return Ok(Self::reduced(-numerator, -denominator));
        }
        Ok(Self::reduced(numerator, denominator))
    }

    /// `denominator` must be positive.
    fn reduced(numerator: BigInt, denominator: BigInt) -> Self {
        let divisor = numerator.gcd(&denominator);
        if divisor.is_one() || divisor.is_zero() {
            return Self {
                numerator,
                denominator,
            };
        }
        Self {
            numerator: numerator / &divisor,
            denominator: denominator / &divisor,
        }
    }

    pub(crate) fn zero() -> Self {
        Self {
            numerator: BigInt::zero(),
            denominator: BigInt::one(),
        }
    }

    pub(crate) fn from_decimal(value: &ExactDecimal) -> Self {
        Self::reduced(value.mantissa().clone(), pow10(value.scale()))
    }

    pub(crate) fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    /// # Errors
    /// [`MathError::DivideByZero`] when `self` is zero.
    pub(crate) fn recip(&self) -> Result<Self> {
        Self::new(self.denominator.clone(), self.numerator.clone())
    }

    /// `value · self`, exact.
    pub(crate) fn scale_by(&self, value: &ExactDecimal) -> Self {
        self * &Self::from_decimal(value)
    }

    /// Square root, exact when numerator and denominator are both perfect
    /// squares, otherwise truncated to `scale` decimal places.
    ///
    /// # Errors
    /// [`MathError::NegativeSqrt`] for a negative fraction.
    pub(crate) fn sqrt(&self, scale: u32, rounding: Rounding) -> Result<Self> {
        if self.numerator.is_negative() {
            return Err(MathError::NegativeSqrt(self.to_string()));
        }
        if let (Some(numerator), Some(denominator)) =
            (exact_isqrt(&self.numerator), exact_isqrt(&self.denominator))
        {
            return Ok(Self {
                numerator,
                denominator,
            });
        }
        let root = sqrt_of_ratio(&self.numerator, &self.denominator, scale, rounding)?;
        Ok(Self::from_decimal(&root))
    }

    /// Integer in the given direction (floor or ceil).
    pub(crate) fn round(&self, rounding: Rounding) -> ExactDecimal {
        ExactDecimal::integer(round_quotient(&self.numerator, &self.denominator, rounding))
    }
}

impl Add<&Fraction> for &Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Self::Output {
        let common = self.denominator.gcd(&rhs.denominator);
        let left = &rhs.denominator / &common;
        let right = &self.denominator / &common;
        Fraction::reduced(
            &self.numerator * &left + &rhs.numerator * &right,
            &self.denominator * left,
        )
    }
}

impl Mul<&Fraction> for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Self::Output {
        Fraction::reduced(
            &self.numerator * &rhs.numerator,
            &self.denominator * &rhs.denominator,
        )
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            return write!(f, "{}", self.numerator);
        }
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
