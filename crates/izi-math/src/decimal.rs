//! Arbitrary-precision signed decimal with explicit rounding.
//!
//! An [`ExactDecimal`] is `mantissa × 10^-scale` with an unbounded
//! [`BigInt`] mantissa. Addition, subtraction and multiplication (`&a + &b`,
//! `&a - &b`, `&a * &b`) and remainder are exact. Every operation that can
//! lose digits (division, square root, truncation) takes a [`Rounding`] and
//! never picks a direction on its own.
//!
//! Values are kept normalised (no trailing zeros in the mantissa), so two
//! equal numbers always compare and hash equal regardless of how they were
//! produced.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use alloy::primitives::U256;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::rounding::Rounding;

/// Exact decimal number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExactDecimal {
    mantissa: BigInt,
    scale: u32,
}

/// `10^exp` as a big integer.
pub(crate) fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

/// `num / den` rounded to an integer in the given direction.
///
/// `den` must be non-zero.
pub(crate) fn round_quotient(num: &BigInt, den: &BigInt, rounding: Rounding) -> BigInt {
    let (quotient, remainder) = num.div_mod_floor(den);
    match rounding {
        Rounding::Down => quotient,
        Rounding::Up if remainder.is_zero() => quotient,
        Rounding::Up => quotient + 1,
    }
}

/// Integer square root of a non-negative integer in the given direction.
fn isqrt(value: &BigUint, rounding: Rounding) -> BigUint {
    let root = value.sqrt();
    if rounding.is_up() && &root * &root != *value {
        root + 1u8
    } else {
        root
    }
}

/// Square root of a perfect square, `None` otherwise.
pub(crate) fn exact_isqrt(value: &BigInt) -> Option<BigInt> {
    if value.is_negative() {
        return None;
    }
    let root = value.sqrt();
    (&root * &root == *value).then_some(root)
}

/// `sqrt(num / den)` truncated to `scale` decimal places.
///
/// Both the radicand and the root are rounded in the same direction, which
/// yields the correctly rounded root: `floor(sqrt(floor(v))) == floor(sqrt(v))`
/// and likewise for the ceiling.
pub(crate) fn sqrt_of_ratio(
    num: &BigInt,
    den: &BigInt,
    scale: u32,
    rounding: Rounding,
) -> Result<ExactDecimal> {
    if den.is_zero() {
        return Err(MathError::DivideByZero);
    }
    if num.sign() != den.sign() && !num.is_zero() {
        return Err(MathError::NegativeSqrt(format!("{num}/{den}")));
    }
    let radicand = round_quotient(&(num.abs() * pow10(2 * scale)), &den.abs(), rounding);
    let radicand = radicand.to_biguint().unwrap_or_default();
    let root = isqrt(&radicand, rounding);
    Ok(ExactDecimal::new(BigInt::from(root), scale))
}

impl ExactDecimal {
    /// Builds `mantissa × 10^-scale`, normalised.
    pub fn new(mantissa: impl Into<BigInt>, scale: u32) -> Self {
        let mut mantissa = mantissa.into();
        if mantissa.is_zero() {
            return Self::zero();
        }
        let ten = BigInt::from(10u8);
        let mut scale = scale;
        while scale > 0 {
            let (quotient, remainder) = mantissa.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            mantissa = quotient;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    pub fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            scale: 0,
        }
    }

    pub fn one() -> Self {
        Self {
            mantissa: BigInt::one(),
            scale: 0,
        }
    }

    /// An integer value.
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Self::new(value, 0)
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Number of decimal places (after normalisation).
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// True when the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    /// The value as a big integer, if it has no fractional part.
    pub fn to_integer(&self) -> Option<BigInt> {
        self.is_integer().then(|| self.mantissa.clone())
    }

    /// The value as a `U256`, if it is a non-negative integer that fits.
    pub fn to_u256(&self) -> Option<U256> {
        let value = self.to_integer()?.to_biguint()?;
        U256::try_from_be_slice(&value.to_bytes_be())
    }

    /// Both mantissas brought to a common scale.
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, u32) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.mantissa.clone(), other.mantissa.clone(), self.scale),
            Ordering::Less => (
                &self.mantissa * pow10(other.scale - self.scale),
                other.mantissa.clone(),
                other.scale,
            ),
            Ordering::Greater => (
                self.mantissa.clone(),
                &other.mantissa * pow10(self.scale - other.scale),
                self.scale,
            ),
        }
    }

    /// Integers `(num, den)` with `self / rhs == num / den`.
    fn ratio(&self, rhs: &Self) -> Result<(BigInt, BigInt)> {
        if rhs.is_zero() {
            return Err(MathError::DivideByZero);
        }
        let common = self.scale.min(rhs.scale);
        Ok((
            &self.mantissa * pow10(rhs.scale - common),
            &rhs.mantissa * pow10(self.scale - common),
        ))
    }

    /// `self^exp`, exact.
    pub fn pow(&self, exp: u32) -> Self {
        Self::new(self.mantissa.pow(exp), self.scale * exp)
    }

    /// Integer quotient `(self - self mod rhs) / rhs`.
    ///
    /// For non-negative operands this is the floor of the exact quotient.
    ///
    /// # Errors
    /// [`MathError::DivideByZero`] when `rhs` is zero.
    pub fn div_floor(&self, rhs: &Self) -> Result<Self> {
        let (num, den) = self.ratio(rhs)?;
        Ok(Self::integer(num / den))
    }

    /// [`Self::div_floor`] plus one unless `self mod rhs == 0`.
    ///
    /// # Errors
    /// [`MathError::DivideByZero`] when `rhs` is zero.
    pub fn div_ceil(&self, rhs: &Self) -> Result<Self> {
        let (num, den) = self.ratio(rhs)?;
        let (quotient, remainder) = num.div_rem(&den);
        if remainder.is_zero() {
            Ok(Self::integer(quotient))
        } else {
            Ok(Self::integer(quotient + 1))
        }
    }

    /// Integer quotient in the given direction.
    ///
    /// # Errors
    /// [`MathError::DivideByZero`] when `rhs` is zero.
    pub fn div_rounded(&self, rhs: &Self, rounding: Rounding) -> Result<Self> {
        match rounding {
            Rounding::Up => self.div_ceil(rhs),
            Rounding::Down => self.div_floor(rhs),
        }
    }

    /// Exact remainder; the sign follows `self`.
    ///
    /// # Errors
    /// [`MathError::DivideByZero`] when `rhs` is zero.
    pub fn rem(&self, rhs: &Self) -> Result<Self> {
        let quotient = self.div_floor(rhs)?;
        Ok(self - &(&quotient * rhs))
    }

    /// Quotient truncated to `scale` decimal places.
    ///
    /// # Errors
    /// [`MathError::DivideByZero`] when `rhs` is zero.
    pub fn div_to_scale(&self, rhs: &Self, scale: u32, rounding: Rounding) -> Result<Self> {
        let (num, den) = self.ratio(rhs)?;
        Ok(Self::new(
            round_quotient(&(num * pow10(scale)), &den, rounding),
            scale,
        ))
    }

    /// Square root truncated to `scale` decimal places.
    ///
    /// Perfect squares come back exact in both directions.
    ///
    /// # Errors
    /// [`MathError::NegativeSqrt`] when `self` is negative.
    pub fn sqrt(&self, scale: u32, rounding: Rounding) -> Result<Self> {
        if self.is_negative() {
            return Err(MathError::NegativeSqrt(self.to_string()));
        }
        sqrt_of_ratio(&self.mantissa, &pow10(self.scale), scale, rounding)
    }

    /// Drops digits beyond `scale` decimal places.
    pub fn truncate_to(&self, scale: u32, rounding: Rounding) -> Self {
        if self.scale <= scale {
            return self.clone();
        }
        Self::new(
            round_quotient(&self.mantissa, &pow10(self.scale - scale), rounding),
            scale,
        )
    }

    /// Nearest integer in the given direction (floor or ceil).
    pub fn round(&self, rounding: Rounding) -> Self {
        self.truncate_to(0, rounding)
    }
}

impl Default for ExactDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for ExactDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl PartialOrd for ExactDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();
        if self.scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl FromStr for ExactDecimal {
    type Err = MathError;

    /// Accepts `123`, `-0.5`, `+7.25` and `0x`-prefixed hex integers.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let parse_err = || MathError::Parse(s.to_string());

        if let Some(hex) = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
        {
            let value = BigInt::parse_bytes(hex.as_bytes(), 16).ok_or_else(parse_err)?;
            return Ok(Self::integer(value));
        }

        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(parse_err());
        }

        let digits = format!("{int_part}{frac_part}");
        let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(parse_err)?;
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        let scale = u32::try_from(frac_part.len()).map_err(|_| parse_err())?;
        Ok(Self::new(BigInt::from_biguint(sign, magnitude), scale))
    }
}

impl TryFrom<String> for ExactDecimal {
    type Error = MathError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ExactDecimal> for String {
    fn from(value: ExactDecimal) -> Self {
        value.to_string()
    }
}

impl From<BigInt> for ExactDecimal {
    fn from(value: BigInt) -> Self {
        Self::integer(value)
    }
}

impl From<BigUint> for ExactDecimal {
    fn from(value: BigUint) -> Self {
        Self::integer(BigInt::from(value))
    }
}

impl From<U256> for ExactDecimal {
    fn from(value: U256) -> Self {
        Self::from(BigUint::from_bytes_be(&value.to_be_bytes::<32>()))
    }
}

impl From<u128> for ExactDecimal {
    fn from(value: u128) -> Self {
        Self::integer(value)
    }
}

impl From<u64> for ExactDecimal {
    fn from(value: u64) -> Self {
        Self::integer(value)
    }
}

impl From<u32> for ExactDecimal {
    fn from(value: u32) -> Self {
        Self::integer(value)
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl Add<&ExactDecimal> for &ExactDecimal {
    type Output = ExactDecimal;

    fn add(self, rhs: &ExactDecimal) -> Self::Output {
        let (a, b, scale) = self.aligned(rhs);
        ExactDecimal::new(a + b, scale)
    }
}

impl Sub<&ExactDecimal> for &ExactDecimal {
    type Output = ExactDecimal;

    fn sub(self, rhs: &ExactDecimal) -> Self::Output {
        let (a, b, scale) = self.aligned(rhs);
        ExactDecimal::new(a - b, scale)
    }
}

impl Mul<&ExactDecimal> for &ExactDecimal {
    type Output = ExactDecimal;

    fn mul(self, rhs: &ExactDecimal) -> Self::Output {
        ExactDecimal::new(&self.mantissa * &rhs.mantissa, self.scale + rhs.scale)
    }
}

impl Neg for ExactDecimal {
    type Output = ExactDecimal;

    fn neg(self) -> Self::Output {
        Self {
            mantissa: -self.mantissa,
            scale: self.scale,
        }
    }
}

impl Sum for ExactDecimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, item| &acc + &item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> ExactDecimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn parse_and_display_round_trip_plain_strings() {
        for text in ["0", "1", "-1", "123.456", "0.0001", "-0.5", "1000000"] {
            assert_eq!(dec(text).to_string(), text);
        }
    }

    #[test]
    fn parse_normalises_trailing_zeros() {
        assert_eq!(dec("1.500"), dec("1.5"));
        assert_eq!(dec("2.000").to_string(), "2");
        assert!(dec("2.000").is_integer());
        assert_eq!(dec("+7").to_string(), "7");
        assert_eq!(dec(".5").to_string(), "0.5");
    }

    #[test]
    fn parse_hex_integers() {
        assert_eq!(dec("0x0"), ExactDecimal::zero());
        assert_eq!(dec("0xff").to_string(), "255");
        assert_eq!(
            dec("0x1000000000000000000000000").to_string(),
            "79228162514264337593543950336"
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in ["", "-", ".", "1.2.3", "abc", "0x", "1e6", "0xzz"] {
            assert!(
                matches!(text.parse::<ExactDecimal>(), Err(MathError::Parse(_))),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn add_sub_mul_are_exact() {
        assert_eq!(&dec("0.1") + &dec("0.2"), dec("0.3"));
        assert_eq!(&dec("1") - &dec("0.0001"), dec("0.9999"));
        assert_eq!(&dec("1.0001") * &dec("1.0001"), dec("1.00020001"));
        assert_eq!(&dec("5") - &dec("7"), dec("-2"));
    }

    #[test]
    fn pow_is_exact() {
        assert_eq!(dec("1.0001").pow(3), dec("1.000300030001"));
        assert_eq!(dec("2").pow(96).to_string(), "79228162514264337593543950336");
        assert_eq!(dec("7").pow(0), ExactDecimal::one());
    }

    #[test]
    fn div_floor_and_ceil_on_integers() {
        assert_eq!(dec("10").div_floor(&dec("3")).unwrap(), dec("3"));
        assert_eq!(dec("10").div_ceil(&dec("3")).unwrap(), dec("4"));
        assert_eq!(dec("9").div_floor(&dec("3")).unwrap(), dec("3"));
        assert_eq!(dec("9").div_ceil(&dec("3")).unwrap(), dec("3"));
        assert_eq!(dec("0").div_ceil(&dec("5")).unwrap(), dec("0"));
    }

    #[test]
    fn div_with_decimal_operands_yields_integer_quotient() {
        // 7.5 / 2.5 == 3, 7.6 / 2.5 == 3.04
        assert_eq!(dec("7.5").div_floor(&dec("2.5")).unwrap(), dec("3"));
        assert_eq!(dec("7.5").div_ceil(&dec("2.5")).unwrap(), dec("3"));
        assert_eq!(dec("7.6").div_floor(&dec("2.5")).unwrap(), dec("3"));
        assert_eq!(dec("7.6").div_ceil(&dec("2.5")).unwrap(), dec("4"));
    }

    #[test]
    fn div_by_zero_fails() {
        let zero = ExactDecimal::zero();
        assert_eq!(dec("1").div_floor(&zero), Err(MathError::DivideByZero));
        assert_eq!(dec("1").div_ceil(&zero), Err(MathError::DivideByZero));
        assert_eq!(dec("1").rem(&zero), Err(MathError::DivideByZero));
        assert_eq!(
            dec("1").div_to_scale(&zero, 10, Rounding::Down),
            Err(MathError::DivideByZero)
        );
    }

    #[test]
    fn rem_sign_follows_dividend() {
        assert_eq!(dec("10").rem(&dec("3")).unwrap(), dec("1"));
        assert_eq!(dec("-10").rem(&dec("3")).unwrap(), dec("-1"));
        assert_eq!(dec("7.6").rem(&dec("2.5")).unwrap(), dec("0.1"));
        assert_eq!(dec("9").rem(&dec("3")).unwrap(), ExactDecimal::zero());
    }

    #[test]
    fn div_to_scale_rounds_in_requested_direction() {
        let third_down = dec("1").div_to_scale(&dec("3"), 5, Rounding::Down).unwrap();
        let third_up = dec("1").div_to_scale(&dec("3"), 5, Rounding::Up).unwrap();
        assert_eq!(third_down, dec("0.33333"));
        assert_eq!(third_up, dec("0.33334"));
        let exact = dec("1").div_to_scale(&dec("4"), 5, Rounding::Up).unwrap();
        assert_eq!(exact, dec("0.25"));
    }

    #[test]
    fn sqrt_of_perfect_square_is_exact_both_ways() {
        assert_eq!(dec("1.00020001").sqrt(20, Rounding::Down).unwrap(), dec("1.0001"));
        assert_eq!(dec("1.00020001").sqrt(20, Rounding::Up).unwrap(), dec("1.0001"));
        assert_eq!(dec("0").sqrt(20, Rounding::Up).unwrap(), ExactDecimal::zero());
    }

    #[test]
    fn sqrt_of_two_brackets_the_root() {
        let down = dec("2").sqrt(10, Rounding::Down).unwrap();
        let up = dec("2").sqrt(10, Rounding::Up).unwrap();
        assert_eq!(down, dec("1.4142135623"));
        assert_eq!(up, dec("1.4142135624"));
        assert!(&down * &down < dec("2"));
        assert!(&up * &up > dec("2"));
    }

    #[test]
    fn sqrt_of_negative_fails() {
        assert!(matches!(
            dec("-4").sqrt(10, Rounding::Down),
            Err(MathError::NegativeSqrt(_))
        ));
    }

    #[test]
    fn round_is_floor_or_ceil() {
        assert_eq!(dec("2.5").round(Rounding::Down), dec("2"));
        assert_eq!(dec("2.5").round(Rounding::Up), dec("3"));
        assert_eq!(dec("2.0001").round(Rounding::Up), dec("3"));
        assert_eq!(dec("-2.5").round(Rounding::Down), dec("-3"));
        assert_eq!(dec("-2.5").round(Rounding::Up), dec("-2"));
        assert_eq!(dec("4").round(Rounding::Up), dec("4"));
    }

    #[test]
    fn ordering_ignores_scale() {
        assert!(dec("1.5") > dec("1.49999"));
        assert!(dec("-1") < dec("0.0001"));
        assert_eq!(dec("3").cmp(&dec("3.000")), Ordering::Equal);
    }

    #[test]
    fn u256_conversions() {
        let q96 = U256::from(1u64) << 96;
        let value = ExactDecimal::from(q96);
        assert_eq!(value.to_string(), "79228162514264337593543950336");
        assert_eq!(value.to_u256(), Some(q96));
        assert_eq!(dec("1.5").to_u256(), None);
        assert_eq!(dec("-1").to_u256(), None);
        assert_eq!(ExactDecimal::from(U256::MAX).to_u256(), Some(U256::MAX));
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&dec("12.5")).expect("serialize");
        assert_eq!(json, "\"12.5\"");
        let parsed: ExactDecimal = serde_json::from_str("\"0x10\"").expect("deserialize");
        assert_eq!(parsed, dec("16"));
        assert!(serde_json::from_str::<ExactDecimal>("\"nope\"").is_err());
    }

    #[test]
    fn sum_of_iterator() {
        let total: ExactDecimal = ["0.1", "0.2", "0.3"].iter().map(|s| dec(s)).sum();
        assert_eq!(total, dec("0.6"));
    }
}
