//! Trading fee arithmetic.
//!
//! Two rounding rules, applied everywhere:
//!
//! - the gross fee is rounded **up**, so the protocol never under-collects;
//! - the protocol-charged share is rounded **down**, so liquidity providers
//!   are never short-changed by the split.
//!
//! The liquidity-provider share is whatever remains: `fee − charged`.

use serde::{Deserialize, Serialize};

use crate::config::{FEE_DENOMINATOR_PPM, GROSS_FEE_NET_RATIO, GROSS_FEE_NUMERATOR};
use crate::decimal::ExactDecimal;
use crate::error::{MathError, Result};

/// Pool fee rate in parts per million (`3000` = 0.3%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FeeTier(u32);

impl FeeTier {
    /// # Errors
    /// [`MathError::InvalidFeeTier`] for tiers at or above 1_000_000 ppm.
    pub fn new(ppm: u32) -> Result<Self> {
        if ppm >= FEE_DENOMINATOR_PPM {
            return Err(MathError::InvalidFeeTier(ppm));
        }
        Ok(Self(ppm))
    }

    pub const fn ppm(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = MathError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FeeTier> for u32 {
    fn from(value: FeeTier) -> Self {
        value.0
    }
}

/// Share of a collected fee retained by the protocol, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ChargePercent(u32);

impl ChargePercent {
    /// The protocol's usual 50/50 split. Callers still pass it explicitly.
    pub const DEFAULT: Self = Self(50);

    /// # Errors
    /// [`MathError::InvalidChargePercent`] above 100.
    pub fn new(percent: u32) -> Result<Self> {
        if percent > 100 {
            return Err(MathError::InvalidChargePercent(percent));
        }
        Ok(Self(percent))
    }

    pub const fn percent(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ChargePercent {
    type Error = MathError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ChargePercent> for u32 {
    fn from(value: ChargePercent) -> Self {
        value.0
    }
}

/// A fee and its split between liquidity providers and the protocol.
///
/// Always `lp_earned + charged == fee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub fee: ExactDecimal,
    pub lp_earned: ExactDecimal,
    pub charged: ExactDecimal,
}

/// `ceil(amount × 3 / 997)`: the fee portion of an amount that already
/// carries the fixed 997/1000 net ratio.
pub fn gross_fee_from_gross_trade_amount(amount: &ExactDecimal) -> Result<ExactDecimal> {
    (amount * &ExactDecimal::from(GROSS_FEE_NUMERATOR))
        .div_ceil(&ExactDecimal::from(GROSS_FEE_NET_RATIO))
}

/// `floor(fee × charge_percent / 100)`: the protocol-retained share.
pub fn fee_charge(fee: &ExactDecimal, charge_percent: ChargePercent) -> Result<ExactDecimal> {
    (fee * &ExactDecimal::from(charge_percent.percent())).div_floor(&ExactDecimal::from(100u32))
}

/// Splits `fee` into the charged share and the LP remainder.
pub fn split_fee(fee: &ExactDecimal, charge_percent: ChargePercent) -> Result<FeeSplit> {
    let charged = fee_charge(fee, charge_percent)?;
    Ok(FeeSplit {
        fee: fee.clone(),
        lp_earned: fee - &charged,
        charged,
    })
}

/// [`gross_fee_from_gross_trade_amount`] followed by [`split_fee`].
pub fn lp_fee_from_gross_trade_amount(
    amount: &ExactDecimal,
    charge_percent: ChargePercent,
) -> Result<FeeSplit> {
    split_fee(&gross_fee_from_gross_trade_amount(amount)?, charge_percent)
}

/// `ceil(amount × tier / (1_000_000 − tier))`: the fee owed on top of a net
/// amount.
pub fn fee_from_net_amount(amount: &ExactDecimal, fee_tier: FeeTier) -> Result<ExactDecimal> {
    let numerator = amount * &ExactDecimal::from(fee_tier.ppm());
    let denominator = ExactDecimal::from(FEE_DENOMINATOR_PPM - fee_tier.ppm());
    numerator.div_ceil(&denominator)
}

/// Fee owed on a net amount at `fee_tier`, split per `charge_percent`.
pub fn fee_from_net_amount_and_tier(
    amount: &ExactDecimal,
    fee_tier: FeeTier,
    charge_percent: ChargePercent,
) -> Result<FeeSplit> {
    split_fee(&fee_from_net_amount(amount, fee_tier)?, charge_percent)
}

/// Grosses a desired net amount up to the total a trader must supply.
pub fn amount_plus_fee(amount: &ExactDecimal, fee_tier: FeeTier) -> Result<ExactDecimal> {
    Ok(amount + &fee_from_net_amount(amount, fee_tier)?)
}
